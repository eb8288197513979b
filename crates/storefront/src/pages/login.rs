//! Account login page.

use crate::locator_map;
use crate::page_object::PageObject;
use crate::result::StorefrontResult;
use crate::session::PageSession;
use crate::wait::UrlPattern;
use async_trait::async_trait;

locator_map! {
    /// Selectors of the login form
    pub struct LoginLocators {
        email_input => "#input-email",
        password_input => "#input-password",
        login_button => r#"input[type="submit"]"#,
        forgot_password_link => r#"a:text("Forgotten Password")"#,
        register_link => r#"a:text("Continue")"#,
        error_message => ".alert-danger",
        email_error => "#input-email-error",
        password_error => "#input-password-error",
        success_message => ".alert-success",
        remember_me => r#"input[name="remember"]"#,
    }
}

/// Returning-customer login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: PageSession,
    locators: LoginLocators,
}

impl LoginPage {
    /// Site path
    pub const PATH: &'static str = "/index.php?route=account/login";

    /// Create the page over a session
    #[must_use]
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            locators: LoginLocators::new(),
        }
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &LoginLocators {
        &self.locators
    }

    /// Enter credentials without submitting
    pub async fn fill_login_form(&self, email: &str, password: &str) -> StorefrontResult<()> {
        self.session
            .fill_input(&self.locators.email_input, email)
            .await?;
        self.session
            .fill_input(&self.locators.password_input, password)
            .await
    }

    /// Enter credentials and submit
    pub async fn login(&self, email: &str, password: &str) -> StorefrontResult<()> {
        self.fill_login_form(email, password).await?;
        self.session.click_element(&self.locators.login_button).await
    }

    /// Enter credentials, tick "remember me", submit
    pub async fn login_with_remember_me(&self, email: &str, password: &str) -> StorefrontResult<()> {
        self.fill_login_form(email, password).await?;
        self.session.click_element(&self.locators.remember_me).await?;
        self.session.click_element(&self.locators.login_button).await
    }

    /// Open password recovery
    pub async fn click_forgot_password(&self) -> StorefrontResult<()> {
        self.session
            .click_element(&self.locators.forgot_password_link)
            .await
    }

    /// Follow the new-customer "Continue" link to registration
    pub async fn click_register(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.register_link).await
    }

    /// Text of the warning banner
    pub async fn error_message(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.error_message).await
    }

    /// Inline error under the email field
    pub async fn email_error(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.email_error).await
    }

    /// Inline error under the password field
    pub async fn password_error(&self) -> StorefrontResult<String> {
        self.session.get_text(&self.locators.password_error).await
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
    pub async fn verify_login_form_validation(&self) -> StorefrontResult<()> {
        self.session.click_element(&self.locators.login_button).await?;
        self.session
            .assert_element_visible(&self.locators.error_message)
            .await
    }

    /// Landed on an account URL
    pub async fn verify_successful_login(&self) -> StorefrontResult<()> {
        let account = UrlPattern::regex(".*account.*")?;
        self.session.wait_for_url(&account).await?;
        self.session.assert_url(&account).await
    }

    /// Fail unless the warning banner is visible
    pub async fn verify_failed_login(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.error_message)
            .await
    }

    /// Empty both credential fields
    pub async fn clear_login_form(&self) -> StorefrontResult<()> {
        self.session.clear_input(&self.locators.email_input).await?;
        self.session
            .clear_input(&self.locators.password_input)
            .await
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn path(&self) -> &str {
        Self::PATH
    }

    fn session(&self) -> &PageSession {
        &self.session
    }

    async fn verify_loaded(&self) -> StorefrontResult<()> {
        self.session
            .assert_element_visible(&self.locators.email_input)
            .await?;
        self.session
            .assert_element_visible(&self.locators.password_input)
            .await?;
        self.session
            .assert_element_visible(&self.locators.login_button)
            .await
    }
}
