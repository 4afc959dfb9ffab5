//! Session commands: register, login, logout, whoami.

use clap::Subcommand;

use taskmart_client::{AuthState, SessionStore};

use super::read_password;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create a new account and start a session
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Start a session with email and password, or via an OAuth redirect URL
    Login {
        /// Email address
        #[arg(short, long, required_unless_present = "oauth_redirect")]
        email: Option<String>,

        /// OAuth redirect URL carrying a `token` query parameter
        #[arg(long, value_name = "URL")]
        oauth_redirect: Option<String>,
    },
    /// End the session and clear cached data
    Logout,
    /// Show the signed-in user
    Whoami,
}

pub async fn dispatch(
    action: AuthAction,
    session: &mut SessionStore,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Register { name, email } => {
            let password = read_password("Password")?;
            let user = session.signup(&name, &email, &password).await?;
            println!("Registered and signed in as {}", user.name);
        }
        AuthAction::Login {
            email,
            oauth_redirect,
        } => {
            if let Some(redirect) = oauth_redirect {
                session.restore(Some(&redirect))?;
                match session.current_user() {
                    Some(user) => println!("Signed in as {}", user.name),
                    None => return Err("redirect URL carried no token".into()),
                }
            } else if let Some(email) = email {
                let password = read_password("Password")?;
                let user = session.login(&email, &password).await?;
                println!("Signed in as {}", user.name);
            }
        }
        AuthAction::Logout => {
            session.logout()?;
            println!("Signed out");
        }
        AuthAction::Whoami => match session.state() {
            AuthState::Authenticated(user) => {
                println!("{}", user.name);
                if let Some(email) = &user.email {
                    println!("{email}");
                }
            }
            AuthState::Anonymous | AuthState::Loading => println!("Not signed in"),
        },
    }
    Ok(())
}
