//! In-memory storefront and widget site for integration tests.
//!
//! Routes are [`MockPage`] navigation handlers that rebuild the document;
//! buttons are click handlers that mutate the shared [`StoreState`] and
//! re-render, so page objects see the same shapes they would in a browser.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use storefront::config::{Reporting, Timeouts};
use storefront::pages::{
    AlertsLocators, CartLocators, ElementsLocators, HomeLocators, LoginLocators,
    PracticeFormLocators, ProductLocators, RegisterLocators, WidgetsLocators,
};
use storefront::{
    EnvironmentConfig, MockDriver, MockElement, MockPage, PageSession, SettlePolicy, UrlPattern,
};
use tempfile::TempDir;

pub const BASE: &str = "https://shop.test";

/// Catalog of the fake shop: name and price in cents
pub const PRODUCTS: &[(&str, u32)] = &[
    ("MacBook", 60_200),
    ("iPhone", 12_320),
    ("Apple Cinema 30\"", 11_000),
    ("Canon EOS 5D", 9_800),
];

fn money(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Default)]
pub struct StoreState {
    /// Product indexes, one per cart row
    pub cart: Vec<usize>,
    /// Removing a row silently fails
    pub stuck_cart: bool,
}

impl StoreState {
    fn total_cents(&self) -> u32 {
        self.cart.iter().map(|&i| PRODUCTS[i].1).sum()
    }

    pub fn cart_label(&self) -> String {
        format!("{} item(s) - {}", self.cart.len(), money(self.total_cents()))
    }
}

pub type Shared = Arc<Mutex<StoreState>>;

/// A session wired to the fake site
pub struct FakeSite {
    pub driver: Arc<MockDriver>,
    pub session: PageSession,
    pub store: Shared,
    pub artifacts: TempDir,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::with_cart(&[])
    }

    pub fn with_cart(items: &[usize]) -> Self {
        let artifacts = tempfile::tempdir().unwrap();
        let config = EnvironmentConfig::from_lookup(|_| None)
            .with_base_url(BASE)
            .with_timeouts(Timeouts {
                default_ms: 300,
                navigation_ms: 300,
                action_ms: 150,
                expect_ms: 150,
            })
            .with_settle(SettlePolicy {
                dom_ready_timeout_ms: 150,
                network_idle_timeout_ms: 150,
                require_network_idle: false,
            })
            .with_reporting(Reporting::rooted_at(artifacts.path()));
        let store: Shared = Arc::new(Mutex::new(StoreState {
            cart: items.to_vec(),
            stuck_cart: false,
        }));
        let driver = Arc::new(MockDriver::new());
        install_routes(&driver, &store);
        let session = PageSession::new(driver.clone(), Arc::new(config));
        Self {
            driver,
            session,
            store,
            artifacts,
        }
    }

    pub fn cart_len(&self) -> usize {
        self.store.lock().unwrap().cart.len()
    }
}

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn install_routes(driver: &MockDriver, store: &Shared) {
    let routes: Vec<(UrlPattern, fn(&mut MockPage, &str, &Shared))> = vec![
        (UrlPattern::Exact(url("/")), render_home),
        (UrlPattern::Contains("route=checkout/cart".into()), render_cart),
        (UrlPattern::Contains("route=account/login".into()), render_login),
        (UrlPattern::Contains("route=account/register".into()), render_register),
        (UrlPattern::Contains("route=product/product".into()), render_product),
        (UrlPattern::Contains("/elements".into()), render_elements),
        (UrlPattern::Contains("/text-box".into()), render_text_box),
        (UrlPattern::Contains("/radio-button".into()), render_radio_button),
        (UrlPattern::Contains("/automation-practice-form".into()), render_practice_form),
        (UrlPattern::Contains("/widgets".into()), render_widgets),
        (UrlPattern::Contains("/select-menu".into()), render_select_menu),
        (UrlPattern::Contains("/alerts".into()), render_alerts),
    ];
    for (pattern, render) in routes {
        let store = store.clone();
        driver.on_navigate(pattern, move |page, url| render(page, url, &store));
    }
}

fn visible(n: usize) -> Vec<MockElement> {
    (0..n).map(|_| MockElement::new()).collect()
}

// ----------------------------------------------------------------------
// Storefront
// ----------------------------------------------------------------------

fn render_home(page: &mut MockPage, _url: &str, store: &Shared) {
    let l = HomeLocators::new();
    page.reset_document();
    page.set_title("Your Store");
    for el in [
        &l.logo,
        &l.search_input,
        &l.search_button,
        &l.cart_button,
        &l.account_dropdown,
        &l.login_link,
        &l.register_link,
        &l.banner_slider,
    ] {
        page.set_element(el, MockElement::new());
    }
    let label = store.lock().unwrap().cart_label();
    page.set_element(&l.cart_count, MockElement::text(label));
    page.set_elements(&l.product_cards, visible(PRODUCTS.len()));
    page.set_elements(&l.add_to_cart_buttons, visible(PRODUCTS.len()));
    page.set_elements(
        &l.product_names,
        PRODUCTS.iter().map(|(name, _)| MockElement::text(*name)).collect(),
    );
    page.set_elements(
        &l.product_prices,
        PRODUCTS.iter().map(|(_, cents)| MockElement::text(money(*cents))).collect(),
    );

    let shared = store.clone();
    page.on_click(&l.add_to_cart_buttons, move |p, index| {
        let label = {
            let mut state = shared.lock().unwrap();
            state.cart.push(index);
            state.cart_label()
        };
        p.set_element(&HomeLocators::new().cart_count, MockElement::text(label));
    });
    page.on_click(&l.product_names, |p, index| {
        p.navigate(&url(&format!(
            "/index.php?route=product/product&product_id={index}"
        )));
    });
    page.on_click(&l.search_button, |p, _| {
        let term = p.value_of(&HomeLocators::new().search_input);
        p.set_url(url(&format!("/index.php?route=product/search&search={term}")));
    });
    page.on_click(&l.cart_button, |p, _| p.navigate(&url("/index.php?route=checkout/cart")));
    page.on_click(&l.login_link, |p, _| p.navigate(&url("/index.php?route=account/login")));
    page.on_click(&l.register_link, |p, _| {
        p.navigate(&url("/index.php?route=account/register"));
    });
}

fn render_product(page: &mut MockPage, url_str: &str, store: &Shared) {
    let index: usize = url_str
        .rsplit("product_id=")
        .next()
        .and_then(|id| id.parse().ok())
        .unwrap_or(0)
        .min(PRODUCTS.len() - 1);
    let (name, cents) = PRODUCTS[index];
    let l = ProductLocators::new();
    page.reset_document();
    page.set_title(name);
    page.set_element(&l.product_name, MockElement::text(name));
    page.set_element(&l.product_price, MockElement::text(money(cents)));
    page.set_element(&l.quantity_input, MockElement::new().with_value("1"));
    page.set_element(&l.add_to_cart_button, MockElement::new());
    page.set_elements(&l.thumbnail_images, visible(3));

    let shared = store.clone();
    page.on_click(&l.add_to_cart_button, move |p, _| {
        let l = ProductLocators::new();
        let quantity: usize = p.value_of(&l.quantity_input).parse().unwrap_or(1);
        shared
            .lock()
            .unwrap()
            .cart
            .extend(std::iter::repeat(index).take(quantity));
        p.set_element(
            &l.success_message,
            MockElement::text(format!(
                "Success: You have added {name} to your shopping cart!"
            )),
        );
    });
}

fn render_cart(page: &mut MockPage, _url: &str, store: &Shared) {
    let l = CartLocators::new();
    page.reset_document();
    page.set_title("Shopping Cart");
    let state = store.lock().unwrap();
    let rows = state.cart.len();

    if rows == 0 {
        page.set_element(
            &l.empty_cart_message,
            MockElement::text("Your shopping cart is empty!"),
        );
        page.set_element(&l.empty_cart_continue_button, MockElement::text("Continue"));
        page.on_click(&l.empty_cart_continue_button, |p, _| p.navigate(&url("/")));
        return;
    }

    page.set_elements(&l.cart_items, visible(rows));
    page.set_elements(
        &l.cart_item_names,
        state.cart.iter().map(|&i| MockElement::text(PRODUCTS[i].0)).collect(),
    );
    page.set_elements(
        &l.cart_item_prices,
        state.cart.iter().map(|&i| MockElement::text(money(PRODUCTS[i].1))).collect(),
    );
    page.set_elements(
        &l.cart_item_totals,
        state.cart.iter().map(|&i| MockElement::text(money(PRODUCTS[i].1))).collect(),
    );
    page.set_elements(
        &l.cart_item_quantities,
        (0..rows)
            .map(|_| MockElement::new().with_attribute("value", "1").with_value("1"))
            .collect(),
    );
    page.set_elements(&l.remove_buttons, visible(rows));
    page.set_element(&l.update_cart_button, MockElement::new());
    page.set_element(&l.checkout_button, MockElement::text("Checkout"));
    let total = money(state.total_cents());
    page.set_element(&l.cart_subtotal, MockElement::text(total.clone()));
    page.set_element(&l.cart_total, MockElement::text(total));
    drop(state);

    let shared = store.clone();
    page.on_click(&l.remove_buttons, move |p, index| {
        {
            let mut state = shared.lock().unwrap();
            if state.stuck_cart {
                return;
            }
            state.cart.remove(index);
        }
        render_cart(p, "", &shared);
    });
}

fn render_login(page: &mut MockPage, _url: &str, _store: &Shared) {
    let l = LoginLocators::new();
    page.reset_document();
    page.set_title("Account Login");
    for el in [&l.email_input, &l.password_input, &l.login_button] {
        page.set_element(el, MockElement::new());
    }
    page.set_element(
        &l.remember_me,
        MockElement::new().with_attribute("type", "checkbox"),
    );
    page.on_click(&l.login_button, |p, _| {
        p.set_element(
            &LoginLocators::new().error_message,
            MockElement::text("Warning: No match for E-Mail Address and/or Password."),
        );
    });
}

fn render_register(page: &mut MockPage, _url: &str, _store: &Shared) {
    let l = RegisterLocators::new();
    page.reset_document();
    page.set_title("Register Account");
    for el in [
        &l.first_name_input,
        &l.last_name_input,
        &l.email_input,
        &l.telephone_input,
        &l.password_input,
        &l.confirm_password_input,
        &l.continue_button,
    ] {
        page.set_element(el, MockElement::new());
    }
    for el in [&l.newsletter_checkbox, &l.privacy_policy_checkbox] {
        page.set_element(el, MockElement::new().with_attribute("type", "checkbox"));
    }
    page.on_click(&l.continue_button, |p, _| {
        let l = RegisterLocators::new();
        if p.value_of(&l.first_name_input).is_empty() {
            p.set_element(
                &l.error_message,
                MockElement::text("Warning: You must agree to the Privacy Policy!"),
            );
            return;
        }
        if p.value_of(&l.password_input) != p.value_of(&l.confirm_password_input) {
            p.set_element(
                &l.confirm_password_error,
                MockElement::text("Password confirmation does not match password!"),
            );
            return;
        }
        p.navigate(&url("/index.php?route=account/success"));
    });
}

// ----------------------------------------------------------------------
// Widget site
// ----------------------------------------------------------------------

fn section(page: &mut MockPage, label: &str, path: &'static str) {
    let link = storefront::pages::section_link(label);
    page.set_element(&link, MockElement::text(label));
    page.on_click(&link, move |p, _| p.navigate(&url(path)));
}

fn render_elements(page: &mut MockPage, _url: &str, _store: &Shared) {
    page.reset_document();
    page.set_title("DEMOQA");
    section(page, "Text Box", "/text-box");
    section(page, "Check Box", "/checkbox");
    section(page, "Radio Button", "/radio-button");
}

fn render_text_box(page: &mut MockPage, _url: &str, _store: &Shared) {
    let l = ElementsLocators::new();
    page.reset_document();
    for el in [
        &l.user_name_input,
        &l.user_email_input,
        &l.current_address_input,
        &l.permanent_address_input,
        &l.submit_button,
    ] {
        page.set_element(el, MockElement::new());
    }
    page.on_click(&l.submit_button, |p, _| {
        let l = ElementsLocators::new();
        let name = p.value_of(&l.user_name_input);
        let email = p.value_of(&l.user_email_input);
        p.set_element(&l.output, MockElement::new());
        p.set_element(&l.output_name, MockElement::text(format!("Name:{name}")));
        p.set_element(&l.output_email, MockElement::text(format!("Email:{email}")));
    });
}

fn render_radio_button(page: &mut MockPage, _url: &str, _store: &Shared) {
    page.reset_document();
    for value in ["yes", "impressive"] {
        let radio = storefront::Locator::new(&format!(r#"input[name="like"][value="{value}"]"#));
        page.set_element(&radio, MockElement::new().with_attribute("type", "radio"));
        let label = if value == "yes" { "Yes" } else { "Impressive" };
        page.on_click(&radio, move |p, _| {
            p.set_element(&ElementsLocators::new().radio_result, MockElement::text(label));
        });
    }
}

fn render_practice_form(page: &mut MockPage, _url: &str, _store: &Shared) {
    let l = PracticeFormLocators::new();
    page.reset_document();
    for el in [
        &l.first_name_input,
        &l.last_name_input,
        &l.email_input,
        &l.mobile_input,
        &l.submit_button,
    ] {
        page.set_element(el, MockElement::new());
    }
    for gender in ["Male", "Female", "Other"] {
        let radio = storefront::Locator::new(&format!(r#"input[name="gender"][value="{gender}"]"#));
        page.set_element(&radio, MockElement::new().with_attribute("type", "radio"));
    }
    page.on_click(&l.submit_button, |p, _| {
        let l = PracticeFormLocators::new();
        let mobile = p.value_of(&l.mobile_input);
        let valid = !p.value_of(&l.first_name_input).is_empty()
            && mobile.len() == 10
            && mobile.chars().all(|c| c.is_ascii_digit());
        if valid {
            p.set_element(&l.confirmation_modal, MockElement::text("Thanks for submitting the form"));
        } else {
            p.set_element(
                &l.first_name_input,
                MockElement::new().with_attribute("class", "form-control was-validated"),
            );
        }
    });
}

fn render_widgets(page: &mut MockPage, _url: &str, _store: &Shared) {
    page.reset_document();
    section(page, "Date Picker", "/date-picker");
    section(page, "Select Menu", "/select-menu");
}

fn render_select_menu(page: &mut MockPage, _url: &str, _store: &Shared) {
    let l = WidgetsLocators::new();
    page.reset_document();
    page.set_element(
        &l.old_select_menu,
        MockElement::new()
            .with_options(["red", "1", "2", "3", "4"])
            .with_value("red"),
    );
}

fn render_alerts(page: &mut MockPage, _url: &str, _store: &Shared) {
    let l = AlertsLocators::new();
    page.reset_document();
    page.set_element(&l.alert_button, MockElement::new());
    page.set_element(&l.confirm_button, MockElement::new());
    page.on_click(&l.confirm_button, |p, _| {
        p.set_element(&AlertsLocators::new().confirm_result, MockElement::text("You selected Ok"));
    });
}
