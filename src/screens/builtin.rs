//! The storefront's stock auth screens.

use crate::core::rules::Rule;
use crate::runtime::navigation::Route;
use crate::screens::ScreenKind;
use crate::screens::config::{DEFAULT_REDIRECT_ERROR, FieldConfig, ScreenConfig};
use indexmap::IndexMap;

pub fn screen_config(kind: ScreenKind) -> ScreenConfig {
    match kind {
        ScreenKind::Login => login(),
        ScreenKind::Signup => signup(),
        ScreenKind::Forgot => forgot(),
        ScreenKind::Verify => verify(),
        ScreenKind::Reset => reset(),
    }
}

fn email_field() -> FieldConfig {
    FieldConfig::text(vec![
        Rule::required("Email is required"),
        Rule::email("Invalid email format"),
    ])
}

fn password_field() -> FieldConfig {
    FieldConfig::text(vec![
        Rule::required("Password is required"),
        Rule::password("Password must be at least 8 characters"),
    ])
}

fn confirm_password_field() -> FieldConfig {
    FieldConfig::text(vec![
        Rule::required("Confirm password is required"),
        Rule::matches("password", "Passwords do not match"),
    ])
}

fn fields<const N: usize>(entries: [(&str, FieldConfig); N]) -> IndexMap<String, FieldConfig> {
    entries
        .into_iter()
        .map(|(id, config)| (id.to_string(), config))
        .collect()
}

fn base(destination: Route, success_message: &str) -> ScreenConfig {
    ScreenConfig {
        destination,
        redirect_delay_ms: 1000,
        success_message: success_message.to_string(),
        invalid_message: None,
        failure_message: None,
        redirect_error_message: DEFAULT_REDIRECT_ERROR.to_string(),
        carousel: false,
        fields: IndexMap::new(),
    }
}

fn login() -> ScreenConfig {
    ScreenConfig {
        failure_message: Some(
            "Login failed. Please check your credentials and try again.".to_string(),
        ),
        redirect_error_message: "Error redirecting to brand information. Please try again."
            .to_string(),
        carousel: true,
        fields: fields([("email", email_field()), ("password", password_field())]),
        ..base(Route::PostAuthLanding, "Login successful! Redirecting...")
    }
}

fn signup() -> ScreenConfig {
    ScreenConfig {
        redirect_delay_ms: 2000,
        invalid_message: Some("Please fill all fields correctly.".to_string()),
        failure_message: Some("Signup failed: {message}".to_string()),
        carousel: true,
        fields: fields([
            (
                "firstName",
                FieldConfig::text(vec![Rule::required("First name is required")]),
            ),
            (
                "lastName",
                FieldConfig::text(vec![Rule::required("Last name is required")]),
            ),
            ("email", email_field()),
            (
                "countryCode",
                FieldConfig::text(vec![
                    Rule::required("Country code is required"),
                    Rule::country_code("Invalid country code"),
                ]),
            ),
            (
                "phone",
                FieldConfig::text(vec![
                    Rule::required("Phone number is required"),
                    Rule::phone("Invalid phone number"),
                ]),
            ),
            ("password", password_field()),
            ("confirmPassword", confirm_password_field()),
            (
                "agreeTerms",
                FieldConfig::toggle(vec![Rule::required("You must agree to the terms")]),
            ),
        ]),
        ..base(Route::Login, "Signup successful! Redirecting to login...")
    }
}

fn forgot() -> ScreenConfig {
    ScreenConfig {
        failure_message: Some("Failed to send reset link: {message}".to_string()),
        redirect_error_message: "Error redirecting to verification page. Redirecting to login..."
            .to_string(),
        fields: fields([("email", email_field())]),
        ..base(
            Route::Verify,
            "Reset link sent! Redirecting to verification page...",
        )
    }
}

fn verify() -> ScreenConfig {
    ScreenConfig {
        invalid_message: Some("Please enter a valid verification code.".to_string()),
        failure_message: Some(
            "Verification failed. Please check the code and try again.".to_string(),
        ),
        fields: fields([(
            "code",
            FieldConfig::text(vec![
                Rule::required("Verification code is required"),
                Rule::min_length(6, "Code must be at least 6 characters"),
                Rule::verification_code("Code must be alphanumeric"),
            ]),
        )]),
        ..base(Route::Reset, "Code verified successfully! Redirecting...")
    }
}

fn reset() -> ScreenConfig {
    ScreenConfig {
        invalid_message: Some("Please enter valid password details.".to_string()),
        failure_message: Some("Password reset failed. Please try again.".to_string()),
        fields: fields([
            ("password", password_field()),
            ("confirmPassword", confirm_password_field()),
        ]),
        ..base(
            Route::Login,
            "Password reset successfully! Redirecting to login...",
        )
    }
}
