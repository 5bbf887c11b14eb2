//! Idempotent creation of the built-in accounts.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{NewUser, UserRepository};
use crate::domain::user_management_service::map_user_persistence_error;
use crate::domain::{Error, PasswordToolkit, PlainPassword, Role};

/// Account ensured to exist at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
    pub password: &'static str,
    /// Whether the email starts out verified.
    pub verified: bool,
}

impl SeedAccount {
    /// One administrator and one regular user.
    pub const DEFAULTS: [SeedAccount; 2] = [
        SeedAccount {
            name: "Admin",
            email: "admin@app.com",
            role: Role::Admin,
            password: "Admin123!@#",
            verified: true,
        },
        SeedAccount {
            name: "User",
            email: "user@app.com",
            role: Role::User,
            password: "User123!@#",
            verified: false,
        },
    ];
}

/// Result of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Accounts inserted by this run.
    pub created: usize,
    /// Accounts already present, matched by email.
    pub existing: usize,
}

/// Inserts missing [`SeedAccount`]s; existing accounts are left untouched.
pub struct AccountSeeder<R> {
    users: Arc<R>,
    passwords: PasswordToolkit,
    clock: Arc<dyn Clock>,
}

impl<R> AccountSeeder<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>, passwords: PasswordToolkit, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            passwords,
            clock,
        }
    }

    /// Ensure every account in `accounts` exists.
    ///
    /// # Errors
    ///
    /// Storage and hashing failures are returned as domain errors.
    pub async fn seed(&self, accounts: &[SeedAccount]) -> Result<SeedOutcome, Error> {
        let mut outcome = SeedOutcome::default();
        for account in accounts {
            let present = self
                .users
                .find_by_email(account.email)
                .await
                .map_err(map_user_persistence_error)?;
            if present.is_some() {
                outcome.existing += 1;
                continue;
            }
            let password_hash = self.passwords.hash(&PlainPassword::new(account.password))?;
            self.users
                .create(NewUser {
                    name: account.name.to_owned(),
                    email: account.email.to_owned(),
                    role: account.role,
                    password_hash,
                    email_verified_at: account.verified.then(|| self.clock.utc()),
                })
                .await
                .map_err(map_user_persistence_error)?;
            info!(email = account.email, role = %account.role, "seed account created");
            outcome.created += 1;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::test_fixtures::{
        fixed_clock, fixture_timestamp, plain_toolkit, user_with_role,
    };

    #[tokio::test]
    async fn creates_missing_accounts_and_skips_existing_ones() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "admin@app.com")
            .returning(|email| Ok(Some(user_with_role(email, Role::Admin))));
        users
            .expect_find_by_email()
            .withf(|email| email == "user@app.com")
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| {
                user.email == "user@app.com"
                    && user.role == Role::User
                    && user.email_verified_at.is_none()
                    && user.password_hash.as_str() == "plain:User123!@#"
            })
            .times(1)
            .returning(|user| Ok(user_with_role(&user.email, user.role)));
        let seeder = AccountSeeder::new(Arc::new(users), plain_toolkit(), fixed_clock());

        let outcome = seeder.seed(&SeedAccount::DEFAULTS).await.expect("seeded");

        assert_eq!(
            outcome,
            SeedOutcome {
                created: 1,
                existing: 1
            }
        );
    }

    #[tokio::test]
    async fn verified_accounts_are_stamped_with_the_clock() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| user.email_verified_at == Some(fixture_timestamp()))
            .times(1)
            .returning(|user| Ok(user_with_role(&user.email, user.role)));
        let seeder = AccountSeeder::new(Arc::new(users), plain_toolkit(), fixed_clock());

        seeder
            .seed(&SeedAccount::DEFAULTS[..1])
            .await
            .expect("seeded");
    }
}
