//! Product detail page.

use crate::locator::Locator;
use crate::locator_map;
use crate::page_object::PageObject;
use crate::result::{StorefrontError, StorefrontResult};
use crate::session::{sanitize_file_stem, PageSession};
use crate::wait::WaitOutcome;
use async_trait::async_trait;
use std::path::PathBuf;

locator_map! {
    /// Selectors of the product page
    pub struct ProductLocators {
        product_name => "h1",
        product_price => ".price-new, .price",
        product_description => "#tab-description",
        thumbnail_images => ".thumbnails img",

        quantity_input => "#input-quantity",
        add_to_cart_button => "#button-cart",
        add_to_wishlist_button => r#"button[onclick*="wishlist.add"]"#,
        compare_button => r#"button[onclick*="compare.add"]"#,

        product_options => ".form-group",
        option_selects => r#"select[name*="option"]"#,
        option_checkboxes => r#"input[type="checkbox"][name*="option"]"#,
        option_text_inputs => r#"input[type="text"][name*="option"]"#,

        reviews_tab => r##"a[href="#tab-review"]"##,
        review_form => "#form-review",
        review_name_input => "#input-name",
        review_text_input => "#input-review",
        review_rating_inputs => r#"input[name="rating"]"#,
        submit_review_button => "#button-review",
        review_list => "#tab-review .review-list",

        related_products => ".product-related",
        related_product_cards => ".product-related .product-thumb",

        breadcrumb_home => r#".breadcrumb a:text("Home")"#,
        breadcrumb_links => ".breadcrumb a",
        breadcrumb_product => ".breadcrumb .active",

        success_message => ".alert-success",
        error_message => ".alert-danger",
    }
}

/// Highest review rating
pub const MAX_RATING: u8 = 5;

/// Product detail page
#[derive(Debug, Clone)]
pub struct ProductPage {
    session: PageSession,
    locators: ProductLocators,
}

impl ProductPage {
    /// Route of product pages; a real product also needs `product_id`
    pub const PATH: &'static str = "/index.php?route=product/product";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: ProductLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &ProductLocators {
        &self.locators
    }

    /// Main image, the first thumbnail
    #[must_use]
    pub fn main_product_image(&self) -> Locator {
        self.locators.thumbnail_images.first()
    }

    /// Breadcrumb link of the product's category
    #[must_use]
    pub fn breadcrumb_category(&self) -> Locator {
        self.locators.breadcrumb_links.nth(1)
    }

    /// Open a specific product by path or URL
    pub async fn navigate_to_product(&self, url: &str) -> StorefrontResult<WaitOutcome> {
        self.session.navigate_to(url).await
    }

    /// Product heading
    pub async fn product_name(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.product_name).await
    }

    /// Displayed price
    pub async fn product_price(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.product_price).await
    }

    /// Text of the description tab
    pub async fn product_description(&self) -> StorefrontResult<String> {
        self.session
            .get_text(&self.locators.product_description)
            .await
    }

    /// Type into the quantity input
    pub async fn set_quantity(&self, quantity: u32) -> StorefrontResult<()> {
        self.session
            .fill_input(&self.locators.quantity_input, &quantity.to_string())
            .await
    }

    /// Click "Add to Cart"
    pub async fn add_to_cart(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.add_to_cart_button)
            .await
    }

    /// Set the quantity, then add to cart
    pub async fn add_to_cart_with_quantity(&self, quantity: u32) -> StorefrontResult<()> {
        self.set_quantity(quantity).await?;
        self.add_to_cart().await
    }

    /// Click the wishlist button
    pub async fn add_to_wishlist(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.add_to_wishlist_button)
            .await
    }

    /// Click the compare button
    pub async fn add_to_compare(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.compare_button)
            .await
    }

    /// Choose `value` in the option select named `option_name`
    pub async fn select_product_option(&self, option_name: &str, value: &str) -> StorefrontResult<()> {
        let select = Locator::new(&format!(r#"select[name="{option_name}"]"#));
        self.session.select_option(&select, value).await
    }

    /// Click the option checkbox named `option_name`
    pub async fn check_product_option(&self, option_name: &str) -> StorefrontResult<()> {
        let checkbox = Locator::new(&format!(r#"input[name="{option_name}"]"#));
        self.session.click_element(&checkbox).await
    }

    /// Type into the option input named `option_name`
    pub async fn fill_product_option(&self, option_name: &str, value: &str) -> StorefrontResult<()> {
        let input = Locator::new(&format!(r#"input[name="{option_name}"]"#));
        self.session.fill_input(&input, value).await
    }

    /// Switch to the reviews tab
    pub async fn open_reviews_tab(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.reviews_tab).await
    }

    /// Write and submit a review.
    ///
    /// `rating` picks the n-th star and must be in `1..=5`.
    pub async fn submit_review(&self, name: &str, text: &str, rating: u8) -> StorefrontResult<()> {
        if !(1..=MAX_RATING).contains(&rating) {
            return Err(StorefrontError::invalid_argument(format!(
                "rating must be between 1 and {MAX_RATING}, got {rating}"
            )));
        }
        self.open_reviews_tab().await?;
        self.session
            .fill_input(&self.locators.review_name_input, name)
            .await?;
        self.session
            .fill_input(&self.locators.review_text_input, text)
            .await?;
        let star = self
            .locators
            .review_rating_inputs
            .nth(usize::from(rating - 1));
        self.session.click_element(&star).await?;
        self.session
            .click_element(&self.locators.submit_review_button)
            .await
    }

    /// Reviews listed under the reviews tab
    pub async fn reviews_count(&self) -> StorefrontResult<usize> {
        self.session
            .count(&self.locators.review_list.locator(".review-item"))
            .await
    }

    /// Cards in the related products strip
    pub async fn related_products_count(&self) -> StorefrontResult<usize> {
        self.session
            .count(&self.locators.related_product_cards)
            .await
    }

    /// Open the `index`-th related product
    pub async fn click_related_product(&self, index: usize) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.related_product_cards.nth(index))
            .await
    }

    /// Follow the home breadcrumb
    pub async fn navigate_to_home_via_breadcrumb(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.breadcrumb_home)
            .await
    }

    /// Follow the category breadcrumb
    pub async fn navigate_to_category_via_breadcrumb(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.breadcrumb_category())
            .await
    }

    /// Text of the success alert
    pub async fn success_message(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.success_message).await
    }

    /// Text of the warning alert
    pub async fn error_message(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.error_message).await
    }

    /// Whether the success alert is showing
    pub async fn is_success_message_visible(&self) -> bool {
        self.session
            .is_element_visible(&self.locators.success_message)
            .await
    }

    /// Whether the warning alert is showing
    pub async fn is_error_message_visible(&self) -> bool {
        self.session
            .is_element_visible(&self.locators.error_message)
            .await
    }

    /// Success alert shown and mentions "Success"
    pub async fn verify_product_added_to_cart(&self) -> StorefrontResult<()> {
        self.verify_success_alert().await
    }

    /// Success alert shown and mentions "Success"
    pub async fn verify_product_added_to_wishlist(&self) -> StorefrontResult<()> {
        self.verify_success_alert().await
    }

    async fn verify_success_alert(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.success_message)
            .await?;
        self.session
            .assert_text_content(&self.locators.success_message, "Success")
            .await
    }

    /// Screenshot named after the product
    pub async fn take_product_screenshot(&self) -> StorefrontResult<PathBuf> {
        let name = self.product_name().await?;
        self.session
            .take_screenshot(&format!("product-{}", sanitize_file_stem(name.trim())))
            .await
    }

    /// Thumbnails in the image gallery
    pub async fn product_images_count(&self) -> StorefrontResult<usize> {
        self.session.count(&self.locators.thumbnail_images).await
    }

    /// Open the `index`-th thumbnail
    pub async fn click_product_image_thumbnail(&self, index: usize) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.thumbnail_images.nth(index))
            .await
    }
}

#[async_trait]
impl PageObject for ProductPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.product_name)
            .await?;
        self.session
            .assert_element_visible(&self.locators.product_price)
            .await?;
        self.session
            .assert_element_visible(&self.locators.add_to_cart_button)
            .await
    }
}
