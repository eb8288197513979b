//! Storefront home page.

use crate::locator::{Locator, Selector};
use crate::locator_map;
use crate::page_object::PageObject;
use crate::result::StorefrontResult;
use crate::session::PageSession;
use crate::wait::{UrlPattern, WaitOutcome};
use async_trait::async_trait;

locator_map! {
    /// Selectors of the home page
    pub struct HomeLocators {
        logo => "#logo",
        search_input => r#"#search input[name="search"]"#,
        search_button => "#search button",
        cart_button => "#cart",
        cart_count => "#cart-total",
        account_dropdown => ".dropdown-toggle",
        login_link => r#"a:text("Login")"#,
        register_link => r#"a:text("Register")"#,
        wishlist_link => "#wishlist-total",

        desktops_menu => r#"a:text("Desktops")"#,
        laptops_menu => r#"a:text("Laptops & Notebooks")"#,
        components_menu => r#"a:text("Components")"#,
        tablets_menu => r#"a:text("Tablets")"#,
        software_menu => r#"a:text("Software")"#,
        phones_menu => r#"a:text("Phones & PDAs")"#,
        cameras_menu => r#"a:text("Cameras")"#,
        mp3_players_menu => r#"a:text("MP3 Players")"#,

        featured_products => "#content .row",
        product_cards => ".product-thumb",
        add_to_cart_buttons => r#"button[onclick*="cart.add"]"#,
        add_to_wishlist_buttons => r#"button[onclick*="wishlist.add"]"#,
        product_names => ".product-thumb h4 a",
        product_prices => ".product-thumb .price",

        banner_slider => "#slideshow0",
        slider_next => ".swiper-button-next",
        slider_prev => ".swiper-button-prev",
    }
}

/// The storefront landing page
#[derive(Debug, Clone)]
pub struct HomePage {
    session: PageSession,
    locators: HomeLocators,
}

impl HomePage {
    /// Site path
    pub const PATH: &'static str = "/";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: HomeLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &HomeLocators {
        &self.locators
    }

    /// Type a product name into the search box and submit
    pub async fn search_product(&self, name: &str) -> StorefrontResult<()> {
        self.session
            .fill_input(&self.locators.search_input, name)
            .await?;
        self.session.click_element(&self.locators.search_button).await
    }

    /// Open the cart dropdown
    pub async fn open_cart(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.cart_button).await
    }

    /// Cart summary text, e.g. `1 item(s) - $123.20`
    pub async fn cart_count(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.cart_count).await
    }

    /// Account dropdown, then "Login"
    pub async fn open_login_page(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.account_dropdown)
            .await?;
        self.session.click_element(&self.locators.login_link).await
    }

    /// Account dropdown, then "Register"
    pub async fn open_registration_page(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.account_dropdown)
            .await?;
        self.session.click_element(&self.locators.register_link).await
    }

    /// Follow the wishlist link
    pub async fn open_wishlist(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.wishlist_link).await
    }

    /// Click the menu link whose text contains `category`
    pub async fn navigate_to_category(&self, category: &str) -> StorefrontResult<()> {
        let link = Locator::from_selector(Selector::css_with_text("a", category));
        self.session.click_element(&link).await
    }

    /// Add the `index`-th listed product to the cart
    pub async fn add_product_to_cart(&self, index: usize) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.add_to_cart_buttons.nth(index))
            .await
    }

    /// Add the `index`-th listed product to the wishlist
    pub async fn add_product_to_wishlist(&self, index: usize) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.add_to_wishlist_buttons.nth(index))
            .await
    }

    /// Name of the `index`-th listed product
    pub async fn product_name(&self, index: usize) -> StorefrontResult<String> {
        self.session
            .get_text(&self.locators.product_names.nth(index))
            .await
    }

    /// Price of the `index`-th listed product
    pub async fn product_price(&self, index: usize) -> StorefrontResult<String> {
        self.session
            .get_text(&self.locators.product_prices.nth(index))
            .await
    }

    /// Open the product page of the `index`-th listed product
    pub async fn click_product(&self, index: usize) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.product_names.nth(index))
            .await
    }

    /// Number of product cards on the page
    pub async fn featured_products_count(&self) -> StorefrontResult<usize> {
        self.session.count(&self.locators.product_cards).await
    }

    /// Advance the slideshow
    pub async fn next_slide(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.slider_next).await
    }

    /// Step the slideshow back
    pub async fn previous_slide(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.slider_prev).await
    }

    /// Search, settle, and require a search results URL
    pub async fn verify_search_functionality(&self, name: &str) -> StorefrontResult<WaitOutcome> {
        self.search_product(name).await?;
        let outcome = self.session.wait_for_page_load().await?;
        self.session
            .assert_url(&UrlPattern::regex(".*search.*")?)
            .await?;
        Ok(outcome)
    }
}

#[async_trait]
impl PageObject for HomePage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session.assert_element_visible(&self.locators.logo).await?;
        self.session
            .assert_element_visible(&self.locators.search_input)
            .await?;
        self.session
            .assert_element_visible(&self.locators.cart_button)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::pages::test_support::mock_session;
    use std::sync::Arc;

    fn home() -> (Arc<MockDriver>, HomePage) {
        let (driver, session) = mock_session();
        (driver, HomePage::new(session))
    }

    fn render_listing(driver: &MockDriver, page: &HomePage) {
        let l = page.locators();
        driver.set_elements(
            &l.product_names,
            vec![MockElement::text("MacBook"), MockElement::text("iPhone")],
        );
        driver.set_elements(
            &l.product_prices,
            vec![MockElement::text("$602.00"), MockElement::text("$123.20")],
        );
        driver.set_elements(&l.product_cards, vec![MockElement::new(), MockElement::new()]);
        driver.set_elements(
            &l.add_to_cart_buttons,
            vec![MockElement::new(), MockElement::new()],
        );
    }

    mod query_tests {
        use super::*;

        #[tokio::test]
        async fn test_product_queries_by_index() {
            let (driver, page) = home();
            render_listing(&driver, &page);
            assert_eq!(page.product_name(1).await.unwrap(), "iPhone");
            assert_eq!(page.product_price(0).await.unwrap(), "$602.00");
            assert_eq!(page.featured_products_count().await.unwrap(), 2);
        }

        #[tokio::test]
        async fn test_out_of_range_index_propagates_not_found() {
            let (driver, page) = home();
            render_listing(&driver, &page);
            let err = page.product_name(7).await.unwrap_err();
            assert!(matches!(
                err,
                crate::StorefrontError::ElementNotFound { .. }
            ));
        }

        #[tokio::test]
        async fn test_cart_count_empty_text() {
            let (driver, page) = home();
            driver.set_element(&page.locators().cart_count, MockElement::new());
            assert_eq!(page.cart_count().await.unwrap(), "");
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_search_fills_then_clicks() {
            let (driver, page) = home();
            driver.set_element(&page.locators().search_input, MockElement::new());
            driver.set_element(&page.locators().search_button, MockElement::new());
            page.search_product("iPhone").await.unwrap();
            let history = driver.history();
            let fill = history.iter().position(|c| c.starts_with("fill:")).unwrap();
            let click = history.iter().position(|c| c.starts_with("click:")).unwrap();
            assert!(fill < click);
            assert!(history[fill].ends_with("=iPhone"));
        }

        #[tokio::test]
        async fn test_open_login_uses_dropdown_first() {
            let (driver, page) = home();
            driver.set_element(&page.locators().account_dropdown, MockElement::new());
            driver.set_element(&page.locators().login_link, MockElement::new());
            page.open_login_page().await.unwrap();
            assert!(driver.was_called("click:.dropdown-toggle"));
            assert!(driver.was_called(r#"click:a:text("Login")"#));
        }

        #[tokio::test]
        async fn test_navigate_to_category_builds_text_locator() {
            let (driver, page) = home();
            driver.set_element(&page.locators().phones_menu, MockElement::new());
            page.navigate_to_category("Phones & PDAs").await.unwrap();
            assert!(driver.was_called(r#"click:a:text("Phones & PDAs")"#));
        }

        #[tokio::test]
        async fn test_add_product_to_cart_clicks_nth_button() {
            let (driver, page) = home();
            render_listing(&driver, &page);
            page.add_product_to_cart(1).await.unwrap();
            assert!(driver.was_called(r#"click:button[onclick*="cart.add"] >> nth=1"#));
        }
    }

    mod verify_tests {
        use super::*;

        #[tokio::test]
        async fn test_verify_loaded_requires_header() {
            let (driver, page) = home();
            driver.set_element(&page.locators().logo, MockElement::new());
            assert!(page.verify_loaded().await.is_err());
            driver.set_element(&page.locators().search_input, MockElement::new());
            driver.set_element(&page.locators().cart_button, MockElement::new());
            page.verify_loaded().await.unwrap();
        }

        #[tokio::test]
        async fn test_verify_search_requires_search_url() {
            let (driver, page) = home();
            driver.set_element(&page.locators().search_input, MockElement::new());
            driver.set_element(&page.locators().search_button, MockElement::new());
            driver.on_click(&page.locators().search_button, |p, _| {
                p.set_url("https://shop.test/index.php?route=product/search&search=iPhone");
            });
            page.verify_search_functionality("iPhone").await.unwrap();
        }
    }
}
