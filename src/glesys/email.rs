//! `email/*` calls: mailboxes and aliases of hosted domains.

use serde::Deserialize;
use tracing::info;

use super::error::{empty_on_not_found, none_on_not_found};
use super::model::{
    EditAccountOptions, EmailAccount, EmailAccountOptions, EmailAlias, EmailOverview,
};
use super::{GlesysClient, GlesysError};

const MODULE: &str = "email";

#[derive(Deserialize)]
struct EmailList {
    list: EmailListBody,
}

#[derive(Deserialize)]
struct EmailListBody {
    #[serde(rename = "emailaccounts", default)]
    accounts: Vec<EmailAccount>,
    #[serde(rename = "emailaliases", default)]
    aliases: Vec<EmailAlias>,
}

#[derive(Deserialize)]
struct OverviewBody {
    overview: EmailOverview,
}

#[derive(Deserialize)]
struct AccountBody {
    #[serde(rename = "emailaccount")]
    account: EmailAccount,
}

pub struct EmailApi<'a> {
    client: &'a GlesysClient,
}

impl<'a> EmailApi<'a> {
    pub(crate) fn new(client: &'a GlesysClient) -> Self {
        Self { client }
    }

    async fn list(&self, domain: &str) -> Result<EmailListBody, GlesysError> {
        self.client
            .call::<EmailList>(MODULE, "list", &[("domainname", domain.to_string())])
            .await
            .map(|list| list.list)
    }

    /// Mailboxes of `domain`; empty when it has none.
    pub async fn list_accounts(&self, domain: &str) -> Result<Vec<EmailAccount>, GlesysError> {
        empty_on_not_found(self.list(domain).await.map(|list| list.accounts))
    }

    /// Aliases of `domain`; empty when it has none.
    pub async fn list_aliases(&self, domain: &str) -> Result<Vec<EmailAlias>, GlesysError> {
        empty_on_not_found(self.list(domain).await.map(|list| list.aliases))
    }

    /// Account-wide usage; `None` when email is not enabled.
    pub async fn get_overview(&self) -> Result<Option<EmailOverview>, GlesysError> {
        let result = self
            .client
            .call::<OverviewBody>(MODULE, "overview", &[])
            .await
            .map(|body| body.overview);
        none_on_not_found(result)
    }

    pub async fn create_account(
        &self,
        account: &str,
        password: &str,
        options: &EmailAccountOptions,
    ) -> Result<EmailAccount, GlesysError> {
        let mut args = vec![
            ("emailaccount", account.to_string()),
            ("password", password.to_string()),
        ];
        args.extend(options.form_args());
        let created = self
            .client
            .call::<AccountBody>(MODULE, "createaccount", &args)
            .await?
            .account;
        info!(account, "created GleSYS mailbox");
        Ok(created)
    }

    pub async fn edit_account(
        &self,
        account: &str,
        options: &EditAccountOptions,
    ) -> Result<EmailAccount, GlesysError> {
        let mut args = vec![("emailaccount", account.to_string())];
        args.extend(options.form_args());
        Ok(self
            .client
            .call::<AccountBody>(MODULE, "editaccount", &args)
            .await?
            .account)
    }

    /// Forward mail for `alias` to `forward_to`.
    pub async fn create_alias(&self, alias: &str, forward_to: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "createalias", &alias_args(alias, forward_to))
            .await
    }

    pub async fn edit_alias(&self, alias: &str, forward_to: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "editalias", &alias_args(alias, forward_to))
            .await
    }

    /// Delete a mailbox or alias. Deleting one that is already gone succeeds.
    pub async fn delete(&self, email: &str) -> Result<(), GlesysError> {
        match self
            .client
            .call_void(MODULE, "delete", &[("email", email.to_string())])
            .await
        {
            Err(e) if e.is_not_found() => Ok(()),
            other => {
                other?;
                info!(email, "deleted GleSYS mailbox or alias");
                Ok(())
            }
        }
    }
}

fn alias_args(alias: &str, forward_to: &str) -> [(&'static str, String); 2] {
    [
        ("emailalias", alias.to_string()),
        ("goto", forward_to.to_string()),
    ]
}
