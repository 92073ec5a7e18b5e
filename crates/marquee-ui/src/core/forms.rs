//! Client-side checks for the account forms, run before anything is sent.

use marquee_api_models::{Role, SignInRequest, SignUpRequest};

/// Validate the sign-in form.
///
/// # Errors
///
/// Returns the message to show next to the form.
pub fn sign_in_request(username: &str, password: &str) -> Result<SignInRequest, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter a username and password.");
    }
    Ok(SignInRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Validate the sign-up form. `role` is the raw select value; blank leaves
/// the choice to the backend.
///
/// # Errors
///
/// Returns the message to show next to the form.
pub fn sign_up_request(
    username: &str,
    password: &str,
    confirm: &str,
    role: &str,
) -> Result<SignUpRequest, &'static str> {
    let SignInRequest { username, password } = sign_in_request(username, password)?;
    if password != confirm {
        return Err("Passwords do not match.");
    }
    let role = match role.trim() {
        "" => None,
        value => Some(value.parse::<Role>().map_err(|_| "Choose a valid role.")?),
    };
    Ok(SignUpRequest {
        username,
        password,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_requires_both_fields() {
        assert!(sign_in_request("  ", "pw").is_err());
        assert!(sign_in_request("alex", "").is_err());
        let request = sign_in_request(" alex ", "pw").expect("valid");
        assert_eq!(request.username, "alex");
    }

    #[test]
    fn sign_up_checks_confirmation_and_role() {
        assert_eq!(
            sign_up_request("alex", "pw", "other", "").map(|_| ()),
            Err("Passwords do not match.")
        );
        assert_eq!(
            sign_up_request("alex", "pw", "pw", "owner").map(|_| ()),
            Err("Choose a valid role.")
        );
        let request = sign_up_request("alex", "pw", "pw", "staff").expect("valid");
        assert_eq!(request.role, Some(Role::Staff));
        assert_eq!(sign_up_request("alex", "pw", "pw", "").expect("valid").role, None);
    }
}
