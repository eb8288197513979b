//! Random test data.
//!
//! [`TestDataGenerator`] owns its RNG so a failing run can be replayed with
//! [`TestDataGenerator::with_seed`].

use crate::pages::RegistrationForm;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Characters [`TestDataGenerator::random_password`] draws from
pub const PASSWORD_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Default password length
pub const DEFAULT_PASSWORD_LENGTH: usize = 8;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Mike", "Sarah", "David", "Lisa", "Tom", "Emma", "Chris", "Anna",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
];
const PRODUCTS: &[&str] = &[
    "iPhone",
    "Samsung Galaxy",
    "MacBook Pro",
    "Dell Laptop",
    "iPad",
    "Sony Camera",
];
const STREETS: &[&str] = &["Main St", "Oak Ave", "Pine Rd", "Elm St", "Maple Dr"];
const CITIES: &[&str] = &["New York", "Los Angeles", "Chicago", "Houston", "Phoenix"];
const STATES: &[&str] = &["NY", "CA", "IL", "TX", "AZ"];
const COUNTRIES: &[&str] = &["United States", "Canada", "United Kingdom", "Australia"];

/// A postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// House number and street
    pub street: String,
    /// City name
    pub city: String,
    /// State or province
    pub state: String,
    /// Five digits
    pub zip_code: String,
    /// Country name
    pub country: String,
}

/// Source of random names, contacts and addresses
#[derive(Debug, Clone)]
pub struct TestDataGenerator {
    rng: StdRng,
}

impl TestDataGenerator {
    /// Seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for `seed`
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `testuser<epoch-ms><6 base-36 chars>@example.com`
    pub fn random_email(&mut self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = (0..6)
            .map(|_| char::from(BASE36[self.rng.gen_range(0..BASE36.len())]))
            .collect();
        format!("testuser{millis}{suffix}@example.com")
    }

    /// `NNN-NNN-NNNN` with no leading zero in any group
    pub fn random_phone(&mut self) -> String {
        let area: u16 = self.rng.gen_range(100..=999);
        let prefix: u16 = self.rng.gen_range(100..=999);
        let line: u16 = self.rng.gen_range(1000..=9999);
        format!("{area}-{prefix}-{line}")
    }

    /// Exactly `length` characters from [`PASSWORD_CHARSET`]
    pub fn random_password(&mut self, length: usize) -> String {
        let charset = PASSWORD_CHARSET.as_bytes();
        (0..length)
            .map(|_| char::from(charset[self.rng.gen_range(0..charset.len())]))
            .collect()
    }

    /// First name from a fixed list
    pub fn random_first_name(&mut self) -> String {
        self.pick(FIRST_NAMES)
    }

    /// Last name from a fixed list
    pub fn random_last_name(&mut self) -> String {
        self.pick(LAST_NAMES)
    }

    /// Name of a product in the demo catalog
    pub fn random_product_name(&mut self) -> String {
        self.pick(PRODUCTS)
    }

    /// Address with a random house number
    pub fn random_address(&mut self) -> Address {
        let number: u16 = self.rng.gen_range(1..=9999);
        let street = self.pick(STREETS);
        let zip: u32 = self.rng.gen_range(10_000..=99_999);
        Address {
            street: format!("{number} {street}"),
            city: self.pick(CITIES),
            state: self.pick(STATES),
            zip_code: zip.to_string(),
            country: self.pick(COUNTRIES),
        }
    }

    /// A complete, consistent registration
    pub fn registration_form(&mut self) -> RegistrationForm {
        let password = self.random_password(DEFAULT_PASSWORD_LENGTH);
        RegistrationForm {
            first_name: self.random_first_name(),
            last_name: self.random_last_name(),
            email: self.random_email(),
            telephone: self.random_phone(),
            confirm_password: password.clone(),
            password,
        }
    }

    fn pick(&mut self, items: &[&str]) -> String {
        items
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}

impl Default for TestDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}
