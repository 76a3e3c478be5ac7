//! Login screen of the storefront.

use pommel_core::driver::LoadState;
use pommel_core::error::Result;
use pommel_core::interactor::Interactor;

const SOURCE: &str = "LoginPage";

const EMAIL_INPUT: &str = "#userEmail";
const PASSWORD_INPUT: &str = "#userPassword";
const LOGIN_BUTTON: &str = "#login";

/// Where the app lands after a successful login.
pub const DASHBOARD_URL: &str = "**/dashboard/dash";

pub struct LoginPage {
    ui: Interactor,
}

impl LoginPage {
    pub fn new(interactor: &Interactor) -> Self {
        Self {
            ui: interactor.with_source(SOURCE),
        }
    }

    pub async fn enter_email(&self, email: &str) -> Result<()> {
        self.ui.fill(EMAIL_INPUT, email).await
    }

    pub async fn enter_password(&self, password: &str) -> Result<()> {
        self.ui.fill(PASSWORD_INPUT, password).await
    }

    /// Submit and let the page settle.
    pub async fn click_login(&self) -> Result<()> {
        self.ui.click(LOGIN_BUTTON).await?;
        self.ui.wait_for_load_state(LoadState::NetworkIdle).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.enter_email(email).await?;
        self.enter_password(password).await?;
        self.click_login().await
    }

    /// Resolves once the URL switches to the dashboard.
    pub async fn wait_for_login_success(&self) -> Result<()> {
        self.ui.wait_for_url(DASHBOARD_URL).await
    }

    pub async fn is_on_login_page(&self) -> Result<bool> {
        Ok(self.ui.is_visible(LOGIN_BUTTON).await? && self.ui.is_visible(EMAIL_INPUT).await?)
    }
}
