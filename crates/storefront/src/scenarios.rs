//! End-to-end journeys.
//!
//! A [`Scenario`] is a named async function over a [`PageSession`]. The
//! [`catalog`] holds every journey the suite ships, tagged so a run can be
//! narrowed to one area (`smoke`, `home`, `auth`, `cart`, `product`,
//! `performance`, `widgets`).

use crate::assertions::{assert_element_count_greater_than, assert_price_format, validate_cart_data};
use crate::page_object::PageObject;
use crate::pages::{
    AlertsPage, CartPage, ElementsPage, HomePage, LoginPage, PracticeFormPage, ProductPage,
    RegisterPage, StudentForm, WidgetsPage,
};
use crate::performance::{assert_default_page_load_time, measure_page_load_time};
use crate::result::{StorefrontError, StorefrontResult};
use crate::session::PageSession;
use crate::test_data::TestDataGenerator;
use crate::wait::{poll_until, Probe, UrlPattern};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Entry point of a scenario
pub type ScenarioFn = fn(PageSession) -> BoxFuture<'static, StorefrontResult<()>>;

/// A named, tagged journey
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Human-readable name, matched by the runner filter
    pub name: &'static str,
    /// Tags used for selection
    pub tags: &'static [&'static str],
    /// The journey itself
    pub run: ScenarioFn,
}

impl Scenario {
    /// Case-insensitive tag check
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Every shipped scenario, in run order
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "home page loads",
            tags: &["smoke", "home"],
            run: |s| home_page_loads(s).boxed(),
        },
        Scenario {
            name: "featured products show prices",
            tags: &["home"],
            run: |s| featured_products_show_prices(s).boxed(),
        },
        Scenario {
            name: "adding a product changes the cart count",
            tags: &["home", "cart"],
            run: |s| add_to_cart_changes_count(s).boxed(),
        },
        Scenario {
            name: "search lands on results",
            tags: &["home"],
            run: |s| search_lands_on_results(s).boxed(),
        },
        Scenario {
            name: "login page loads",
            tags: &["smoke", "auth"],
            run: |s| login_page_loads(s).boxed(),
        },
        Scenario {
            name: "unknown credentials are rejected",
            tags: &["auth"],
            run: |s| unknown_credentials_rejected(s).boxed(),
        },
        Scenario {
            name: "empty registration shows validation",
            tags: &["auth"],
            run: |s| empty_registration_shows_validation(s).boxed(),
        },
        Scenario {
            name: "mismatched passwords fail registration",
            tags: &["auth"],
            run: |s| mismatched_passwords_fail_registration(s).boxed(),
        },
        Scenario {
            name: "product page adds to cart",
            tags: &["product", "cart"],
            run: |s| product_page_adds_to_cart(s).boxed(),
        },
        Scenario {
            name: "cart summary is well formed",
            tags: &["cart"],
            run: |s| cart_summary_well_formed(s).boxed(),
        },
        Scenario {
            name: "empty cart continues home",
            tags: &["smoke", "cart"],
            run: |s| empty_cart_continues_home(s).boxed(),
        },
        Scenario {
            name: "home page loads within budget",
            tags: &["performance"],
            run: |s| home_page_within_budget(s).boxed(),
        },
        Scenario {
            name: "text box echoes input",
            tags: &["widgets"],
            run: |s| text_box_echoes_input(s).boxed(),
        },
        Scenario {
            name: "practice form submits",
            tags: &["widgets"],
            run: |s| practice_form_submits(s).boxed(),
        },
        Scenario {
            name: "radio button selection",
            tags: &["widgets"],
            run: |s| radio_button_selection(s).boxed(),
        },
        Scenario {
            name: "select menu keeps value",
            tags: &["widgets"],
            run: |s| select_menu_keeps_value(s).boxed(),
        },
        Scenario {
            name: "confirm dialog is accepted",
            tags: &["widgets"],
            run: |s| confirm_dialog_accepted(s).boxed(),
        },
    ]
}

async fn home_page_loads(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session);
    home.open().await?;
    home.verify_loaded().await
}

async fn featured_products_show_prices(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session);
    home.open().await?;
    assert_element_count_greater_than(home.featured_products_count().await?, 0)?;
    let name = home.product_name(0).await?;
    if name.trim().is_empty() {
        return Err(StorefrontError::assertion(
            "expected a product name, actual \"\"",
        ));
    }
    assert_price_format(home.product_price(0).await?.trim())
}

async fn add_to_cart_changes_count(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session);
    home.open().await?;
    let before = home.cart_count().await?;
    home.add_product_to_cart(0).await?;

    let timeout = home.session().config().timeouts().expect();
    let (page, initial) = (&home, before.as_str());
    let outcome = poll_until(timeout, move || async move {
        let now = page.cart_count().await?;
        Ok(if now == initial {
            Probe::Retry(now)
        } else {
            Probe::Done(now)
        })
    })
    .await?;
    match outcome {
        Probe::Done(after) => {
            tracing::debug!(%before, %after, "cart count changed");
            Ok(())
        }
        Probe::Retry(after) => Err(StorefrontError::assertion(format!(
            "expected cart count to change from {before:?}, actual {after:?}"
        ))),
    }
}

async fn search_lands_on_results(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session);
    home.open().await?;
    let product = TestDataGenerator::new().random_product_name();
    home.verify_search_functionality(&product).await?;
    Ok(())
}

async fn login_page_loads(session: PageSession) -> StorefrontResult<()> {
    let login = LoginPage::new(session);
    login.open().await?;
    login.verify_loaded().await
}

async fn unknown_credentials_rejected(session: PageSession) -> StorefrontResult<()> {
    let login = LoginPage::new(session);
    login.open().await?;
    let mut data = TestDataGenerator::new();
    let email = data.random_email();
    let password = data.random_password(12);
    login.login(&email, &password).await?;
    login.verify_failed_login().await
}

async fn empty_registration_shows_validation(session: PageSession) -> StorefrontResult<()> {
    let register = RegisterPage::new(session);
    register.open().await?;
    register.verify_registration_form_validation().await
}

async fn mismatched_passwords_fail_registration(session: PageSession) -> StorefrontResult<()> {
    let register = RegisterPage::new(session);
    register.open().await?;
    let mut data = TestDataGenerator::new();
    let form = data.registration_form();
    let mismatch = format!("{}x", form.password);
    let form = form.with_confirm_password(mismatch);
    register.register_without_newsletter(&form).await?;
    register.verify_failed_registration().await
}

async fn product_page_adds_to_cart(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session.clone());
    home.open().await?;
    home.click_product(0).await?;
    session.wait_for_page_load().await?;

    let product = ProductPage::new(session);
    product.verify_loaded().await?;
    product.add_to_cart().await?;
    product.verify_product_added_to_cart().await
}

async fn cart_summary_well_formed(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session.clone());
    home.open().await?;
    home.add_product_to_cart(0).await?;

    let cart = CartPage::new(session);
    cart.open().await?;
    cart.verify_cart_has_items().await?;
    let summary = cart.cart_summary().await?;
    validate_cart_data(&serde_json::to_value(&summary)?)?;
    for line in &summary.items {
        assert_price_format(line.price.trim())?;
    }
    Ok(())
}

async fn empty_cart_continues_home(session: PageSession) -> StorefrontResult<()> {
    let cart = CartPage::new(session.clone());
    cart.open().await?;
    if !cart.is_cart_empty().await {
        cart.clear_cart().await?;
    }
    cart.verify_cart_is_empty().await?;
    cart.click_empty_cart_continue().await?;
    session.wait_for_page_load().await?;
    HomePage::new(session).verify_loaded().await
}

async fn home_page_within_budget(session: PageSession) -> StorefrontResult<()> {
    let home = HomePage::new(session.clone());
    home.open().await?;
    let elapsed = measure_page_load_time(&session).await?;
    assert_default_page_load_time(elapsed)?;
    home.verify_loaded().await
}

async fn text_box_echoes_input(session: PageSession) -> StorefrontResult<()> {
    let elements = ElementsPage::new(session);
    elements.open().await?;
    elements.open_section("Text Box").await?;
    elements
        .fill_text_box(
            "Test User",
            "test@example.com",
            "123 Test Street",
            "456 Permanent Street",
        )
        .await?;
    elements.submit_text_box().await?;
    elements.verify_text_box_output("Test User").await
}

async fn practice_form_submits(session: PageSession) -> StorefrontResult<()> {
    let form = PracticeFormPage::new(session.clone());
    form.open().await?;
    form.verify_loaded().await?;
    let mut data = TestDataGenerator::new();
    let student = StudentForm {
        first_name: data.random_first_name(),
        last_name: data.random_last_name(),
        email: data.random_email(),
        gender: "Male".to_string(),
        mobile: data.random_phone().replace('-', ""),
    };
    form.fill_student_form(&student).await?;
    form.submit().await?;
    form.verify_submitted().await?;
    session
        .assert_url(&UrlPattern::Contains("automation-practice-form".into()))
        .await
}

async fn radio_button_selection(session: PageSession) -> StorefrontResult<()> {
    let elements = ElementsPage::new(session.clone());
    elements.open().await?;
    elements.open_section("Radio Button").await?;
    elements.select_radio("yes").await?;
    session
        .assert_text_content(&elements.locators().radio_result, "Yes")
        .await
}

async fn select_menu_keeps_value(session: PageSession) -> StorefrontResult<()> {
    let widgets = WidgetsPage::new(session);
    widgets.open().await?;
    widgets.open_section("Select Menu").await?;
    widgets.select_old_menu("1").await?;
    widgets.verify_old_menu_value("1").await
}

async fn confirm_dialog_accepted(session: PageSession) -> StorefrontResult<()> {
    let alerts = AlertsPage::new(session);
    alerts.open().await?;
    alerts.trigger_confirm().await?;
    alerts.verify_confirm_accepted().await
}
