use tracing::info;

use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::page::page_model::{PageId, PageObject};
use crate::selector::candidate::{Candidate, ElementMap};
use crate::sync::policy::{Condition, SyncPolicy};

pub const LOGIN_FORM: &str = "login form";
pub const EMAIL_INPUT: &str = "email input";
pub const PASSWORD_INPUT: &str = "password input";
pub const SIGN_IN_BUTTON: &str = "sign in button";

#[derive(Debug, Clone)]
pub struct LoginPage {
    elements: ElementMap,
}

impl LoginPage {
    pub fn new() -> Self {
        let elements = ElementMap::new(PageId::Login)
            .with(LOGIN_FORM, vec![Candidate::fuzzy("form")])
            .with(
                EMAIL_INPUT,
                vec![
                    Candidate::exact("#email"),
                    Candidate::exact("input[name=\"email\"]"),
                    Candidate::fuzzy("input[type=\"email\"]"),
                ],
            )
            .with(
                PASSWORD_INPUT,
                vec![
                    Candidate::exact("#password"),
                    Candidate::exact("input[name=\"password\"]"),
                    Candidate::fuzzy("input[type=\"password\"]"),
                ],
            )
            .with(
                SIGN_IN_BUTTON,
                vec![
                    Candidate::fuzzy("button.btn-primary"),
                    Candidate::fuzzy("button[type=\"submit\"]"),
                    Candidate::text(Some("button"), "sign in|log ?in"),
                ],
            );
        LoginPage { elements }
    }

    /// Fill both credentials (clearing any prior content) and submit.
    pub fn login(
        &self,
        driver: &mut dyn Driver,
        sync: &SyncPolicy,
        email: &str,
        password: &str,
    ) -> Result<(), FlowError> {
        info!(email, "logging in");
        self.locate(driver, EMAIL_INPUT, sync)?.fill(driver, email)?;
        self.locate(driver, PASSWORD_INPUT, sync)?.fill(driver, password)?;
        self.locate(driver, SIGN_IN_BUTTON, sync)?.click(driver)
    }

    /// The browser left the login route and the credential form is gone.
    /// The URL alone is not enough when the site serves its login screen
    /// from a path without "login" in it.
    pub fn verify_logged_in(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        self.assert_that(driver, sync, &Condition::url_not_contains("login"), "login accepted")?;
        self.assert_that(driver, sync, &Condition::absent(PASSWORD_INPUT), "login form gone")
    }
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageObject for LoginPage {
    fn id(&self) -> PageId {
        PageId::Login
    }

    fn elements(&self) -> &ElementMap {
        &self.elements
    }

    fn defining_conditions(&self) -> Vec<Condition> {
        vec![
            Condition::visible(LOGIN_FORM),
            Condition::visible(EMAIL_INPUT),
            Condition::visible(PASSWORD_INPUT),
            Condition::visible(SIGN_IN_BUTTON),
        ]
    }
}
