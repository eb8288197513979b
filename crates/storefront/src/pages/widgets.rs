//! Form and widget pages of the demo site.
//!
//! Each category page lists its sections in a side menu; [`open_section`]
//! follows one of those entries by its label.

use crate::locator::{Locator, Selector};
use crate::locator_map;
use crate::page_object::PageObject;
use crate::result::{StorefrontError, StorefrontResult};
use crate::session::PageSession;
use crate::wait::WaitOutcome;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Side-menu entry with the given label
#[must_use]
pub fn section_link(name: &str) -> Locator {
    Locator::from_selector(Selector::css_with_text("span", name))
}

/// Click a side-menu entry and wait for the section to load
pub async fn open_section(session: &PageSession, name: &str) -> StorefrontResult<WaitOutcome> {
    tracing::debug!(section = name, "open section");
    session.click_element(&section_link(name)).await?;
    session.wait_for_page_load().await
}

locator_map! {
    /// Selectors of the Elements category
    pub struct ElementsLocators {
        text_box_section => r#"span:text("Text Box")"#,
        check_box_section => r#"span:text("Check Box")"#,
        radio_button_section => r#"span:text("Radio Button")"#,

        user_name_input => "#userName",
        user_email_input => "#userEmail",
        current_address_input => "#currentAddress",
        permanent_address_input => "#permanentAddress",
        submit_button => "#submit",
        output => "#output",
        output_name => "#name",
        output_email => "#email",

        expand_toggle => ".rct-collapse-btn",
        check_box_result => "#result",

        like_radios => r#"input[name="like"]"#,
        radio_result => ".text-success",
    }
}

/// Text box, check box and radio button sections
#[derive(Debug, Clone)]
pub struct ElementsPage {
    session: PageSession,
    locators: ElementsLocators,
}

impl ElementsPage {
    /// Category landing path
    pub const PATH: &'static str = "/elements";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: ElementsLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &ElementsLocators {
        &self.locators
    }

    /// Follow the side-menu entry labelled `name`
    pub async fn open_section(&self, name: &str) -> StorefrontResult<WaitOutcome> {
        open_section(&self.session, name).await
    }

    /// Fill all four text box fields
    pub async fn fill_text_box(
        &self,
        name: &str,
        email: &str,
        current_address: &str,
        permanent_address: &str,
    ) -> StorefrontResult<()> {
        let l = &self.locators;
        self.session.fill_input(&l.user_name_input, name).await?;
        self.session.fill_input(&l.user_email_input, email).await?;
        self.session
            .fill_input(&l.current_address_input, current_address)
            .await?;
        self.session
            .fill_input(&l.permanent_address_input, permanent_address)
            .await
    }

    /// Submit the text box form
    pub async fn submit_text_box(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.submit_button).await
    }

    /// Whether the echoed output panel is showing
    pub async fn is_output_visible(&self) -> bool {
        self.session.is_element_visible(&self.locators.output).await
    }

    /// Echoed `Name:` line
    pub async fn output_name(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.output_name).await
    }

    /// Echoed `Email:` line
    pub async fn output_email(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.output_email).await
    }

    /// Output panel shown and echoes `name`
    pub async fn verify_text_box_output(&self, name: &str) -> StorefrontResult<()> {
        self.session.assert_element_visible(&self.locators.output).await?;
        self.session
            .assert_text_content(&self.locators.output_name, name)
            .await
    }

    /// Expand every node of the check box tree
    pub async fn expand_check_box_tree(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.expand_toggle).await
    }

    /// Tick the tree node labelled `label`
    pub async fn tick_check_box(&self, label: &str) -> StorefrontResult<()> {
        self.session.click_element(&section_link(label)).await
    }

    /// Summary line listing ticked nodes
    pub async fn check_box_result(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.check_box_result).await
    }

    /// Pick the radio whose value is `value`, e.g. `yes` or `impressive`
    pub async fn select_radio(&self, value: &str) -> StorefrontResult<()> {
        let radio = Locator::new(&format!(r#"input[name="like"][value="{value}"]"#));
        self.session.click_element(&radio).await
    }

    /// "You have selected" result text
    pub async fn radio_result(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.radio_result).await
    }
}

#[async_trait]
impl PageObject for ElementsPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.text_box_section)
            .await
    }
}

/// Values for the student registration form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Optional email
    pub email: String,
    /// `Male`, `Female` or `Other`
    pub gender: String,
    /// Ten digits
    pub mobile: String,
}

locator_map! {
    /// Selectors of the practice form
    pub struct PracticeFormLocators {
        first_name_input => "#firstName",
        last_name_input => "#lastName",
        email_input => "#userEmail",
        gender_radios => r#"input[name="gender"]"#,
        mobile_input => "#userNumber",
        submit_button => "#submit",
        confirmation_modal => ".modal-content",
    }
}

/// Student registration form under Forms
#[derive(Debug, Clone)]
pub struct PracticeFormPage {
    session: PageSession,
    locators: PracticeFormLocators,
}

impl PracticeFormPage {
    /// Form path
    pub const PATH: &'static str = "/automation-practice-form";

    /// Menu label of this form under the Forms category
    pub const SECTION: &'static str = "Practice Form";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: PracticeFormLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &PracticeFormLocators {
        &self.locators
    }

    /// Follow the side-menu entry labelled `name`
    pub async fn open_section(&self, name: &str) -> StorefrontResult<WaitOutcome> {
        open_section(&self.session, name).await
    }

    /// Fill name, email, gender and mobile
    pub async fn fill_student_form(&self, form: &StudentForm) -> StorefrontResult<()> {
        let l = &self.locators;
        self.session
            .fill_input(&l.first_name_input, &form.first_name)
            .await?;
        self.session
            .fill_input(&l.last_name_input, &form.last_name)
            .await?;
        self.session.fill_input(&l.email_input, &form.email).await?;
        let gender = Locator::new(&format!(
            r#"input[name="gender"][value="{}"]"#,
            form.gender
        ));
        self.session.click_element(&gender).await?;
        self.session.fill_input(&l.mobile_input, &form.mobile).await
    }

    /// Submit the form
    pub async fn submit(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.submit_button).await
    }

    /// Whether the confirmation modal is showing
    pub async fn is_confirmation_visible(&self) -> bool {
        self.session
            .is_element_visible(&self.locators.confirmation_modal)
            .await
    }

    /// Confirmation dialog shown
    pub async fn verify_submitted(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.confirmation_modal)
            .await
    }

    /// The first-name input carries the validation class
    pub async fn verify_validation_triggered(&self) -> StorefrontResult<()> {
        self.session
            .assert_attribute_matches(&self.locators.first_name_input, "class", ".*was-validated.*")
            .await
    }
}

#[async_trait]
impl PageObject for PracticeFormPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.first_name_input)
            .await
    }
}

locator_map! {
    /// Selectors of the Widgets category
    pub struct WidgetsLocators {
        date_picker_section => r#"span:text("Date Picker")"#,
        select_menu_section => r#"span:text("Select Menu")"#,
        date_input => "#datePickerMonthYearInput",
        selected_day => ".react-datepicker__day--selected",
        old_select_menu => "#oldSelectMenu",
    }
}

/// Date picker and select menu sections
#[derive(Debug, Clone)]
pub struct WidgetsPage {
    session: PageSession,
    locators: WidgetsLocators,
}

impl WidgetsPage {
    /// Category landing path
    pub const PATH: &'static str = "/widgets";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: WidgetsLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &WidgetsLocators {
        &self.locators
    }

    /// Follow the side-menu entry labelled `name`
    pub async fn open_section(&self, name: &str) -> StorefrontResult<WaitOutcome> {
        open_section(&self.session, name).await
    }

    /// Open the calendar and click the highlighted day
    pub async fn pick_selected_day(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.date_input).await?;
        self.session
            .click_element(&self.locators.selected_day)
            .await
    }

    /// Current value of the date picker input
    pub async fn date_value(&self) -> StorefrontResult<String> {
        self.session.input_value(&self.locators.date_input).await
    }

    /// Fail when the date input is empty
    pub async fn verify_date_selected(&self) -> StorefrontResult<()> {
        let value = self.date_value().await?;
        if value.trim().is_empty() {
            return Err(StorefrontError::assertion(
                "expected a date in #datePickerMonthYearInput, actual \"\"",
            ));
        }
        Ok(())
    }

    /// Choose `value` in the old-style select
    pub async fn select_old_menu(&self, value: &str) -> StorefrontResult<()> {
        self.session
            .select_option(&self.locators.old_select_menu, value)
            .await
    }

    /// Fail unless the old-style select holds `expected`
    pub async fn verify_old_menu_value(&self, expected: &str) -> StorefrontResult<()> {
        self.session
            .assert_input_value(&self.locators.old_select_menu, expected)
            .await
    }
}

#[async_trait]
impl PageObject for WidgetsPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.date_picker_section)
            .await
    }
}

locator_map! {
    /// Selectors of the Alerts section
    pub struct AlertsLocators {
        alert_button => "#alertButton",
        confirm_button => "#confirmButton",
        confirm_result => "#confirmResult",
    }
}

/// Browser dialogs triggered from buttons
#[derive(Debug, Clone)]
pub struct AlertsPage {
    session: PageSession,
    locators: AlertsLocators,
}

impl AlertsPage {
    /// Section path
    pub const PATH: &'static str = "/alerts";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: AlertsLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &AlertsLocators {
        &self.locators
    }

    /// Follow the side-menu entry labelled `name`
    pub async fn open_section(&self, name: &str) -> StorefrontResult<WaitOutcome> {
        open_section(&self.session, name).await
    }

    /// Accept dialogs, then fire the simple alert
    pub async fn trigger_alert(&self) -> StorefrontResult<()> {
        self.session.accept_dialogs().await?;
        self.session.click_element(&self.locators.alert_button).await
    }

    /// Accept dialogs, then fire the confirm box
    pub async fn trigger_confirm(&self) -> StorefrontResult<()> {
        self.session.accept_dialogs().await?;
        self.session
            .click_element(&self.locators.confirm_button)
            .await
    }

    /// Result text after the confirm dialog
    pub async fn confirm_result(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.confirm_result).await
    }

    /// Fail unless the confirm dialog was accepted
    pub async fn verify_confirm_accepted(&self) -> StorefrontResult<()> {
        self.session
            .assert_text_content(&self.locators.confirm_result, "Ok")
            .await
    }
}

#[async_trait]
impl PageObject for AlertsPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.alert_button)
            .await
    }
}
