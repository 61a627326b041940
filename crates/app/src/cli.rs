//! Command-line parsing.

use std::fmt;

use adex_domain::{Locale, LoginCredentials, TransactionFilter};

/// A subcommand and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the session.
    Login(LoginCredentials),
    /// Clear the stored session.
    Logout,
    /// Fetch the profile from the backend.
    Profile,
    /// List investment plans.
    Plans,
    /// Show wallet balances.
    Wallet,
    /// List wallet transactions.
    Transactions(TransactionFilter),
    /// Store the `Accept-Language` preference.
    Locale(Locale),
    /// Print the stored user without contacting the backend.
    WhoAmI,
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{USAGE}", self.0)
    }
}

impl std::error::Error for UsageError {}

pub const USAGE: &str = "usage: adex <command>

commands:
  login <email> <password> [2fa-code]
  logout
  profile
  plans
  wallet
  transactions [all|deposit|withdrawal|profit|referral_bonus]
  locale <tag>
  whoami";

impl Command {
    /// Parses the arguments following the program name.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] for unknown commands or missing arguments.
    pub fn parse<I>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args
            .next()
            .ok_or_else(|| UsageError("missing command".to_string()))?;
        let rest: Vec<String> = args.collect();

        let command = match (name.as_str(), rest.as_slice()) {
            ("login", [email, password]) => Self::Login(LoginCredentials::new(email, password)),
            ("login", [email, password, code]) => {
                Self::Login(LoginCredentials::new(email, password).with_two_factor(code))
            }
            ("logout", []) => Self::Logout,
            ("profile", []) => Self::Profile,
            ("plans", []) => Self::Plans,
            ("wallet", []) => Self::Wallet,
            ("transactions", []) => Self::Transactions(TransactionFilter::All),
            ("transactions", [filter]) => Self::Transactions(
                filter
                    .parse()
                    .map_err(|e| UsageError(format!("{e}")))?,
            ),
            ("locale", [tag]) => {
                Self::Locale(Locale::parse(tag).map_err(|e| UsageError(format!("{e}")))?)
            }
            ("whoami", []) => Self::WhoAmI,
            ("login" | "logout" | "profile" | "plans" | "wallet" | "transactions" | "locale"
            | "whoami", _) => {
                return Err(UsageError(format!("wrong arguments for `{name}`")));
            }
            (other, _) => return Err(UsageError(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Command, UsageError> {
        Command::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn parses_login_with_optional_code() {
        assert_eq!(
            parse(&["login", "ada@example.com", "secret"]).unwrap(),
            Command::Login(LoginCredentials::new("ada@example.com", "secret"))
        );
        assert_eq!(
            parse(&["login", "ada@example.com", "secret", "123456"]).unwrap(),
            Command::Login(
                LoginCredentials::new("ada@example.com", "secret").with_two_factor("123456")
            )
        );
    }

    #[test]
    fn parses_filters_and_locales() {
        assert_eq!(
            parse(&["transactions"]).unwrap(),
            Command::Transactions(TransactionFilter::All)
        );
        assert_eq!(
            parse(&["transactions", "referral_bonus"]).unwrap(),
            Command::Transactions(TransactionFilter::ReferralBonus)
        );
        assert_eq!(
            parse(&["locale", "pt-BR"]).unwrap(),
            Command::Locale(Locale::parse("pt-BR").unwrap())
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["login", "only-email"]).is_err());
        assert!(parse(&["wallet", "extra"]).is_err());
        assert!(parse(&["transactions", "bogus"]).is_err());
        assert!(parse(&["deploy"]).is_err());
    }
}
