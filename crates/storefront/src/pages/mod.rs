//! Concrete page objects.
//!
//! The storefront pages (`home`, `login`, `register`, `product`, `cart`)
//! target an OpenCart-style shop; `widgets` covers the demo site's form and
//! widget screens.

pub mod cart;
pub mod home;
pub mod login;
pub mod product;
pub mod register;
pub mod widgets;

pub use cart::{CartLine, CartLocators, CartPage, CartSummary};
pub use home::{HomeLocators, HomePage};
pub use login::{LoginLocators, LoginPage};
pub use product::{ProductLocators, ProductPage};
pub use register::{RegisterLocators, RegisterPage, RegistrationForm};
pub use widgets::{
    open_section, section_link, AlertsLocators, AlertsPage, ElementsLocators, ElementsPage,
    PracticeFormLocators, PracticeFormPage, StudentForm, WidgetsLocators, WidgetsPage,
};
