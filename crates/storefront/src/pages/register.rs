//! Account registration page.

use crate::locator::Locator;
use crate::locator_map;
use crate::page_object::PageObject;
use crate::result::StorefrontResult;
use crate::session::PageSession;
use crate::wait::UrlPattern;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

locator_map! {
    /// Selectors of the registration form
    pub struct RegisterLocators {
        first_name_input => "#input-firstname",
        last_name_input => "#input-lastname",
        email_input => "#input-email",
        telephone_input => "#input-telephone",
        password_input => "#input-password",
        confirm_password_input => "#input-confirm",
        newsletter_checkbox => r#"input[name="newsletter"]"#,
        privacy_policy_checkbox => r#"input[name="agree"]"#,
        continue_button => r#"input[type="submit"]"#,
        back_button => r#"a:text("Back")"#,
        error_message => ".alert-danger",
        first_name_error => "#input-firstname-error",
        last_name_error => "#input-lastname-error",
        email_error => "#input-email-error",
        telephone_error => "#input-telephone-error",
        password_error => "#input-password-error",
        confirm_password_error => "#input-confirm-error",
        success_message => ".alert-success",
    }
}

/// Values for every registration field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Account email
    pub email: String,
    /// Contact phone
    pub telephone: String,
    /// Chosen password
    pub password: String,
    /// Must equal `password` to register
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Same form with a different confirmation password
    #[must_use]
    pub fn with_confirm_password(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_password = confirm.into();
        self
    }

    /// Whether password and confirmation agree
    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

/// New-customer registration form
#[derive(Debug, Clone)]
pub struct RegisterPage {
    session: PageSession,
    locators: RegisterLocators,
}

impl RegisterPage {
    /// Site path
    pub const PATH: &'static str = "/index.php?route=account/register";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: RegisterLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &RegisterLocators {
        &self.locators
    }

    /// Type name, email and telephone
    pub async fn fill_personal_details(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        telephone: &str,
    ) -> StorefrontResult<()> {
        let l = &self.locators;
        self.session.fill_input(&l.first_name_input, first_name).await?;
        self.session.fill_input(&l.last_name_input, last_name).await?;
        self.session.fill_input(&l.email_input, email).await?;
        self.session.fill_input(&l.telephone_input, telephone).await
    }

    /// Type the password and its confirmation
    pub async fn fill_password_fields(&self, password: &str, confirm: &str) -> StorefrontResult<()> {
        self.session
            .fill_input(&self.locators.password_input, password)
            .await?;
        self.session
            .fill_input(&self.locators.confirm_password_input, confirm)
            .await
    }

    /// Fill every field without submitting
    pub async fn fill_registration_form(&self, form: &RegistrationForm) -> StorefrontResult<()> {
        self.fill_personal_details(&form.first_name, &form.last_name, &form.email, &form.telephone)
            .await?;
        self.fill_password_fields(&form.password, &form.confirm_password)
            .await
    }

    /// Fill, subscribe, accept the policy, submit
    pub async fn register_with_newsletter(&self, form: &RegistrationForm) -> StorefrontResult<()> {
        self.fill_registration_form(form).await?;
        self.toggle_newsletter().await?;
        self.accept_privacy_policy().await?;
        self.click_continue().await
    }

    /// Fill, accept the policy, submit
    pub async fn register_without_newsletter(&self, form: &RegistrationForm) -> StorefrontResult<()> {
        self.fill_registration_form(form).await?;
        self.accept_privacy_policy().await?;
        self.click_continue().await
    }

    /// Submit the form
    pub async fn click_continue(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.continue_button)
            .await
    }

    /// Leave registration
    pub async fn click_back(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.back_button).await
    }

    /// Flip the newsletter radio
    pub async fn toggle_newsletter(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.newsletter_checkbox)
            .await
    }

    /// Tick the privacy policy checkbox
    pub async fn accept_privacy_policy(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.privacy_policy_checkbox)
            .await
    }

    /// Text of the warning banner
    pub async fn error_message(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.error_message).await
    }

    /// Inline error under `#input-<field>`, e.g. `field_error("confirm")`
    pub async fn field_error(&self, field: &str) -> StorefrontResult<String> {
        self.session
            .get_text(&Locator::new(&format!("#input-{field}-error")))
            .await
    }

    /// Text of the success banner
    pub async fn success_message(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.success_message).await
    }

    /// Whether the warning banner is showing
    pub async fn is_error_message_visible(&self) -> bool {
        self.session
            .is_element_visible(&self.locators.error_message)
            .await
    }

    /// Whether the success banner is showing
    pub async fn is_success_message_visible(&self) -> bool {
        self.session
            .is_element_visible(&self.locators.success_message)
            .await
    }

    /// Submit the empty form and expect the error banner
    pub async fn verify_registration_form_validation(&self) -> StorefrontResult<()> {
        self.click_continue().await?;
        self.session
            .assert_element_visible(&self.locators.error_message)
            .await
    }

    /// Landed on the success URL
    pub async fn verify_successful_registration(&self) -> StorefrontResult<()> {
        let success = UrlPattern::regex(".*success.*")?;
        self.session.wait_for_url(&success).await?;
        self.session.assert_url(&success).await
    }

    /// The error banner or any inline field error is shown
    pub async fn verify_failed_registration(&self) -> StorefrontResult<()> {
        let l = &self.locators;
        self.session
            .assert_any_element_visible(&[
                &l.error_message,
                &l.confirm_password_error,
                &l.password_error,
                &l.email_error,
                &l.first_name_error,
                &l.last_name_error,
                &l.telephone_error,
            ])
            .await
    }

    /// Empty every text field
    pub async fn clear_registration_form(&self) -> StorefrontResult<()> {
        let l = &self.locators;
        for input in [
            &l.first_name_input,
            &l.last_name_input,
            &l.email_input,
            &l.telephone_input,
            &l.password_input,
            &l.confirm_password_input,
        ] {
            self.session.clear_input(input).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PageObject for RegisterPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        let l = &self.locators;
        for input in [
            &l.first_name_input,
            &l.last_name_input,
            &l.email_input,
            &l.telephone_input,
            &l.password_input,
            &l.confirm_password_input,
        ] {
            self.session.assert_element_visible(input).await?;
        }
        Ok(())
    }
}
