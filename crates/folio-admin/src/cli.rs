//! One-shot subcommands for scripting. Running with no subcommand opens the
//! dashboard.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use folio_core::models::{Certificate, CertificateFilter, CertificateUpdate, NewCertificate};
use folio_core::utils::{format_date, truncate};
use folio_core::Config;

const USERNAME_ENV: &str = "FOLIO_USERNAME";
const PASSWORD_ENV: &str = "FOLIO_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "folio-admin", version, about = "Manage a certificate portfolio")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the access token
    Login {
        /// Defaults to $FOLIO_USERNAME or the last username used
        username: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Show the account behind the stored token
    Whoami,

    /// Check that the service is reachable
    Health,

    /// List certificates
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        issuer: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        query: Option<String>,

        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a certificate with an attached image or PDF
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        issuer: String,

        /// YYYY-MM-DD
        #[arg(long)]
        issue_date: String,

        #[command(flatten)]
        details: Details,

        /// Image or PDF to attach
        #[arg(long)]
        file: PathBuf,
    },

    /// Change fields of an existing certificate
    Update {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        issuer: Option<String>,

        #[arg(long)]
        issue_date: Option<String>,

        #[command(flatten)]
        details: Details,
    },

    /// Replace the attached file of a certificate
    ReplaceFile { id: i64, file: PathBuf },

    /// Delete a certificate
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Optional fields shared by create and update
#[derive(Args, Debug, Default)]
pub struct Details {
    #[arg(long)]
    pub expiry_date: Option<String>,

    #[arg(long)]
    pub credential_id: Option<String>,

    #[arg(long)]
    pub verify_url: Option<String>,

    /// Comma separated
    #[arg(long)]
    pub tags: Option<String>,
}

pub async fn run(command: Command, mut config: Config) -> Result<()> {
    let client = config.connect()?;
    debug!(api_base = %client.base_url(), ?command, "Running command");

    match command {
        Command::Login { username } => {
            let username = match username
                .or_else(|| std::env::var(USERNAME_ENV).ok())
                .or_else(|| config.last_username.clone())
            {
                Some(name) => name,
                None => prompt("Username: ")?,
            };
            let password = match std::env::var(PASSWORD_ENV) {
                Ok(password) => password,
                Err(_) => rpassword::prompt_password("Password: ")
                    .context("Failed to read password")?,
            };

            client.login(username.trim(), &password).await?;
            config.last_username = Some(username.trim().to_string());
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Logged in as {}", username.trim());
        }

        Command::Logout => {
            client.logout()?;
            println!("Logged out");
        }

        Command::Whoami => {
            let user = client.current_user().await?;
            match user.created_at.as_deref() {
                Some(created) => println!("{} (id {}, since {})", user.username, user.id, format_date(created)),
                None => println!("{} (id {})", user.username, user.id),
            }
        }

        Command::Health => {
            let health = client.health().await?;
            if !health.is_ok() {
                bail!("{} reported status \"{}\"", client.base_url(), health.status);
            }
            println!("{}: {}", client.base_url(), health.status);
        }

        Command::List { skip, limit, issuer, tag, query, json } => {
            let filter = CertificateFilter {
                skip,
                limit,
                issuer: issuer.unwrap_or_default(),
                tag: tag.unwrap_or_default(),
                query: query.unwrap_or_default(),
            };
            let certificates = client.list_certificates(&filter).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&certificates)?);
            } else {
                print_table(&certificates);
            }
        }

        Command::Create { title, issuer, issue_date, details, file } => {
            let new = NewCertificate {
                title,
                issuer,
                issue_date,
                expiry_date: details.expiry_date,
                credential_id: details.credential_id,
                verify_url: details.verify_url,
                tags: details.tags,
                file,
            };
            let cert = client.create_certificate(&new).await?;
            println!("Created #{} {}", cert.id, cert.display_title());
        }

        Command::Update { id, title, issuer, issue_date, details } => {
            let update = CertificateUpdate {
                title,
                issuer,
                issue_date,
                expiry_date: details.expiry_date,
                credential_id: details.credential_id,
                verify_url: details.verify_url,
                tags: details.tags,
            };
            if update.is_empty() {
                bail!("Nothing to update - pass at least one field");
            }
            let cert = client.update_certificate(id, &update).await?;
            println!("Updated #{} {}", cert.id, cert.display_title());
        }

        Command::ReplaceFile { id, file } => {
            let cert = client.replace_certificate_file(id, &file).await?;
            println!(
                "Replaced file of #{}: {}",
                cert.id,
                cert.image_url(client.base_url()).unwrap_or_default()
            );
        }

        Command::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete certificate #{}? [y/N] ", id))? {
                println!("Cancelled");
                return Ok(());
            }
            client.delete_certificate(id).await?;
            println!("Deleted #{}", id);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(question)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn print_table(certificates: &[Certificate]) {
    if certificates.is_empty() {
        println!("No certificates");
        return;
    }
    println!("{:>5}  {:<40}  {:<20}  {:<12}  {}", "ID", "TITLE", "ISSUER", "ISSUED", "TAGS");
    for cert in certificates {
        println!("{}", table_row(cert));
    }
}

fn table_row(cert: &Certificate) -> String {
    format!(
        "{:>5}  {:<40}  {:<20}  {:<12}  {}",
        cert.id,
        truncate(cert.display_title(), 40),
        truncate(cert.display_issuer(), 20),
        cert.issue_date.as_deref().map(format_date).unwrap_or_default(),
        cert.tag_list().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_dashboard() {
        let cli = Cli::try_parse_from(["folio-admin"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_flags() {
        let cli = Cli::try_parse_from([
            "folio-admin", "list", "--tag", "aws", "-q", "architect", "--limit", "10",
        ])
        .unwrap();
        match cli.command {
            Some(Command::List { skip, limit, tag, query, issuer, json }) => {
                assert_eq!(skip, 0);
                assert_eq!(limit, Some(10));
                assert_eq!(tag.as_deref(), Some("aws"));
                assert_eq!(query.as_deref(), Some("architect"));
                assert_eq!(issuer, None);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_create_requires_file() {
        let result = Cli::try_parse_from([
            "folio-admin", "create", "--title", "CKA", "--issuer", "CNCF", "--issue-date",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_takes_shared_details() {
        let cli = Cli::try_parse_from([
            "folio-admin", "update", "7", "--tags", "Cloud, AWS", "--expiry-date", "2027-01-01",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Update { id, title, details, .. }) => {
                assert_eq!(id, 7);
                assert_eq!(title, None);
                assert_eq!(details.tags.as_deref(), Some("Cloud, AWS"));
                assert_eq!(details.expiry_date.as_deref(), Some("2027-01-01"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replace_file_and_delete() {
        let cli = Cli::try_parse_from(["folio-admin", "replace-file", "3", "/tmp/new.pdf"]).unwrap();
        assert!(matches!(cli.command, Some(Command::ReplaceFile { id: 3, .. })));

        let cli = Cli::try_parse_from(["folio-admin", "delete", "3", "-y"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Delete { id: 3, yes: true })));
    }

    #[test]
    fn test_table_row() {
        let cert = Certificate {
            id: 12,
            title: Some("AWS Solutions Architect".to_string()),
            issuer: Some("Amazon".to_string()),
            issue_date: Some("2024-01-15".to_string()),
            expiry_date: None,
            credential_id: None,
            verify_url: None,
            tags: Some("AWS, Cloud".to_string()),
            image_path: None,
            created_at: None,
        };
        let row = table_row(&cert);
        assert!(row.starts_with("   12  AWS Solutions Architect"));
        assert!(row.contains("Jan 15, 2024"));
        assert!(row.ends_with("AWS, Cloud"));
    }
}
