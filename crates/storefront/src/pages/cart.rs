//! Shopping cart page.

use crate::locator::Locator;
use crate::locator_map;
use crate::page_object::PageObject;
use crate::result::{StorefrontError, StorefrontResult};
use crate::session::PageSession;
use crate::wait::WaitOutcome;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

locator_map! {
    /// Selectors of the cart page
    pub struct CartLocators {
        cart_items => ".table-responsive tbody tr",
        cart_item_names => ".table-responsive tbody tr td.text-left a",
        cart_item_prices => ".table-responsive tbody tr td.text-right:nth-child(3)",
        cart_item_quantities => r#".table-responsive tbody tr td input[type="text"]"#,
        cart_item_totals => ".table-responsive tbody tr td.text-right:nth-child(5)",
        remove_buttons => r#".table-responsive tbody tr td button[onclick*="cart.remove"]"#,

        cart_subtotal => ".table-responsive tbody tr:last-child td.text-right:nth-child(2)",
        cart_total => ".table-responsive tbody tr:last-child td.text-right:nth-child(3)",
        checkout_button => r#"a:text("Checkout")"#,
        continue_shopping_button => r#"a:text("Continue Shopping")"#,
        update_cart_button => r#"button[onclick*="cart.update"]"#,

        empty_cart_message => r#"p:text("Your shopping cart is empty!")"#,
        empty_cart_continue_button => r#"a:text("Continue")"#,

        coupon_input => "#input-coupon",
        apply_coupon_button => "#button-coupon",
        voucher_input => "#input-voucher",
        apply_voucher_button => "#button-voucher",

        country_select => "#input-country",
        region_select => "#input-zone",
        postcode_input => "#input-postcode",
        get_quotes_button => "#button-quote",
    }
}

/// One row of the cart as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product name
    pub name: String,
    /// Unit price
    pub price: String,
    /// Quantity input value
    pub quantity: String,
    /// Line total
    pub total: String,
}

/// Snapshot of the whole cart
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    /// Number of rows
    pub items_count: usize,
    /// Sub-Total row of the totals table
    pub subtotal: String,
    /// Total row of the totals table
    pub total: String,
    /// Rows in display order
    pub items: Vec<CartLine>,
}

/// Shopping cart page
#[derive(Debug, Clone)]
pub struct CartPage {
    session: PageSession,
    locators: CartLocators,
}

impl CartPage {
    /// Site path
    pub const PATH: &'static str = "/index.php?route=checkout/cart";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: CartLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &CartLocators {
        &self.locators
    }

    /// Number of item rows
    pub async fn cart_items_count(&self) -> StorefrontResult<usize> {
        self.session.count(&self.locators.cart_items).await
    }

    /// Name of row `index`
    pub async fn cart_item_name(&self, index: usize) -> StorefrontResult<String> {
        self.session
            .get_text(&self.locators.cart_item_names.nth(index))
            .await
    }

    /// Unit price of row `index`
    pub async fn cart_item_price(&self, index: usize) -> StorefrontResult<String> {
        self.session
            .get_text(&self.locators.cart_item_prices.nth(index))
            .await
    }

    /// The quantity input's `value` attribute, `""` when absent
    pub async fn cart_item_quantity(&self, index: usize) -> StorefrontResult<String> {
        let value = self
            .session
            .get_attribute(&self.locators.cart_item_quantities.nth(index), "value")
            .await?;
        Ok(value.unwrap_or_default())
    }

    /// Line total of row `index`
    pub async fn cart_item_total(&self, index: usize) -> StorefrontResult<String> {
        self.session
            .get_text(&self.locators.cart_item_totals.nth(index))
            .await
    }

    /// Type a new quantity; takes effect on [`Self::click_update_cart`]
    pub async fn update_cart_item_quantity(&self, index: usize, quantity: u32) -> StorefrontResult<()> {
        self.session
            .fill_input(
                &self.locators.cart_item_quantities.nth(index),
                &quantity.to_string(),
            )
            .await
    }

    /// Click the remove button of row `index`
    pub async fn remove_cart_item(&self, index: usize) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.remove_buttons.nth(index))
            .await
    }

    /// Proceed to checkout
    pub async fn click_checkout(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.checkout_button)
            .await
    }

    /// Leave the cart for the catalog
    pub async fn click_continue_shopping(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.continue_shopping_button)
            .await
    }

    /// Submit typed quantities
    pub async fn click_update_cart(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.update_cart_button)
            .await
    }

    /// Text of the Sub-Total cell
    pub async fn cart_subtotal(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.cart_subtotal).await
    }

    /// Text of the Total cell
    pub async fn cart_total(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.cart_total).await
    }

    /// Whether the empty-cart message is showing
    pub async fn is_cart_empty(&self) -> bool {
        self.session
            .is_element_visible(&self.locators.empty_cart_message)
            .await
    }

    /// Continue link shown on the empty cart
    pub async fn click_empty_cart_continue(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.empty_cart_continue_button)
            .await
    }

    /// Fill and apply a coupon code
    pub async fn apply_coupon(&self, code: &str) -> StorefrontResult<()> {
        self.session
            .fill_input(&self.locators.coupon_input, code)
            .await?;
        self.session
            .click_element(&self.locators.apply_coupon_button)
            .await
    }

    /// Fill and apply a gift voucher code
    pub async fn apply_voucher(&self, code: &str) -> StorefrontResult<()> {
        self.session
            .fill_input(&self.locators.voucher_input, code)
            .await?;
        self.session
            .click_element(&self.locators.apply_voucher_button)
            .await
    }

    /// Fill the shipping estimate form and request quotes
    pub async fn estimate_shipping(
        &self,
        country: &str,
        region: &str,
        postcode: &str,
    ) -> StorefrontResult<()> {
        self.session
            .select_option(&self.locators.country_select, country)
            .await?;
        self.session
            .select_option(&self.locators.region_select, region)
            .await?;
        self.session
            .fill_input(&self.locators.postcode_input, postcode)
            .await?;
        self.session
            .click_element(&self.locators.get_quotes_button)
            .await
    }

    /// Fail unless the empty-cart message is visible
    pub async fn verify_cart_is_empty(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.empty_cart_message)
            .await
    }

    /// Fail unless at least one row is present
    pub async fn verify_cart_has_items(&self) -> StorefrontResult<()> {
        let count = self.cart_items_count().await?;
        if count == 0 {
            return Err(StorefrontError::assertion(
                "expected cart items, actual 0 rows",
            ));
        }
        Ok(())
    }

    /// Some row's name contains `product_name`
    pub async fn verify_cart_item_exists(&self, product_name: &str) -> StorefrontResult<()> {
        let count = self.cart_items_count().await?;
        let mut seen = Vec::with_capacity(count);
        for index in 0..count {
            let name = self.cart_item_name(index).await?;
            if name.contains(product_name) {
                return Ok(());
            }
            seen.push(name);
        }
        Err(StorefrontError::assertion(format!(
            "expected cart item containing {product_name:?}, actual {seen:?}"
        )))
    }

    /// Remove every item.
    ///
    /// Always removes the first row and re-counts, so a list that shrinks
    /// underneath is handled. A removal that leaves the count unchanged is an
    /// error rather than a loop.
    pub async fn clear_cart(&self) -> StorefrontResult<()> {
        let mut remaining = self.cart_items_count().await?;
        while remaining > 0 {
            self.remove_cart_item(0).await?;
            if let WaitOutcome::ProceededWithoutNetworkIdle { waited_ms } =
                self.session.wait_for_page_load().await?
            {
                tracing::debug!(waited_ms, "cart removal settled without network idle");
            }
            let now = self.cart_items_count().await?;
            if now >= remaining {
                return Err(StorefrontError::invalid_state(format!(
                    "removing a cart item left {now} rows (was {remaining})"
                )));
            }
            remaining = now;
        }
        Ok(())
    }

    /// Set quantities row by row, then submit the update.
    ///
    /// Names are snapshotted first; if the row at an index no longer carries
    /// the snapshotted name when its quantity is about to be written, the
    /// update stops with [`StorefrontError::StaleSnapshot`].
    pub async fn update_all_cart_items_quantities(&self, quantities: &[u32]) -> StorefrontResult<()> {
        let count = self.cart_items_count().await?;
        if quantities.len() > count {
            return Err(StorefrontError::invalid_argument(format!(
                "{} quantities for {count} cart rows",
                quantities.len()
            )));
        }
        let mut snapshot = Vec::with_capacity(quantities.len());
        for index in 0..quantities.len() {
            snapshot.push(self.cart_item_name(index).await?);
        }

        for (index, (&quantity, expected)) in quantities.iter().zip(&snapshot).enumerate() {
            let current = self.cart_item_name(index).await?;
            if &current != expected {
                return Err(StorefrontError::StaleSnapshot {
                    message: format!(
                        "row {index} changed from {expected:?} to {current:?} during update"
                    ),
                });
            }
            self.update_cart_item_quantity(index, quantity).await?;
        }
        self.click_update_cart().await
    }

    /// Read every row plus the totals
    pub async fn cart_summary(&self) -> StorefrontResult<CartSummary> {
        let items_count = self.cart_items_count().await?;
        let subtotal = self.cart_subtotal().await?;
        let total = self.cart_total().await?;

        let mut items = Vec::with_capacity(items_count);
        for index in 0..items_count {
            items.push(CartLine {
                name: self.cart_item_name(index).await?,
                price: self.cart_item_price(index).await?,
                quantity: self.cart_item_quantity(index).await?,
                total: self.cart_item_total(index).await?,
            });
        }

        Ok(CartSummary {
            items_count,
            subtotal,
            total,
            items,
        })
    }

    fn first_row(&self) -> Locator {
        self.locators.cart_items.first()
    }
}

#[async_trait]
impl PageObject for CartPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session.assert_element_visible(&self.first_row()).await?;
        self.session
            .assert_element_visible(&self.locators.checkout_button)
            .await
    }
}
