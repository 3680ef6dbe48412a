//! Kickstartr CLI: browse the template storefront and publish templates.
//!
//! Reads KICKSTARTR_API_URL (or API_URL), KICKSTARTR_SESSION_COOKIE and
//! KICKSTARTR_MOCK_MODE. Session auth is cookie based; `login` prints the
//! cookie to export for later invocations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kickstartr_api_client::{transport_for, ApiClient, Catalog};
use kickstartr_cli::{
    bundle_row, init_tracing, load_archive, publish_failure, template_row, TracingObserver,
};
use kickstartr_core::forms::{BundleForm, PackageForm, TagForm, TemplateForm, TemplateVersionForm};
use kickstartr_core::models::{PackageManager, Visibility};
use kickstartr_core::{slugify, ClientConfig, TagPicker};
use kickstartr_publish::{PublishInput, Publisher, RecordMetadata};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kickstartr", about = "Kickstartr storefront CLI")]
struct Cli {
    /// Serve the sample catalog and keep uploads in memory
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the session cookie
    Login {
        email: String,
        #[arg(long, env = "KICKSTARTR_PASSWORD")]
        password: String,
    },
    /// Create an account
    Register {
        name: String,
        email: String,
        #[arg(long, env = "KICKSTARTR_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the logged-in user
    Me,
    /// Show the profile with licenses
    Profile,
    /// Browse templates
    Templates {
        #[command(subcommand)]
        sub: TemplateCommands,
    },
    /// Browse bundles
    Bundles {
        #[command(subcommand)]
        sub: BundleCommands,
    },
    /// Tag lookup
    Tags {
        #[command(subcommand)]
        sub: TagCommands,
    },
    /// Comment on a template
    Comment {
        template_id: String,
        text: String,
        /// Send as a private note to the developer
        #[arg(long)]
        developer: bool,
    },
    /// Print the slug derived from a name
    Slug { text: String },
    /// Upload an archive and create its record
    Publish {
        #[command(subcommand)]
        sub: PublishCommands,
    },
    /// Admin creation forms
    Admin {
        #[command(subcommand)]
        sub: AdminCommands,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List public templates
    List {
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Template detail with versions sorted latest first
    Get { id: String },
}

#[derive(Subcommand)]
enum BundleCommands {
    List {
        #[arg(long, default_value = "table")]
        format: String,
    },
    Get { id: String },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Tags whose name, slug or category contains the query
    Search { query: String },
}

#[derive(Subcommand)]
enum PublishCommands {
    /// Create a new template with its first version
    Template {
        /// Template name
        name: String,
        /// Path to the .zip archive
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        version: String,
        /// Defaults to the slug derived from the name
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// public or private
        #[arg(long, default_value = "public")]
        visibility: Visibility,
        #[arg(long, default_value = "0")]
        price: String,
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Tag ids, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Add a version to an existing template
    Version {
        template_id: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        version: String,
        /// Release notes
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    Tag {
        name: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        category: String,
    },
    Package {
        name: String,
        #[arg(long, default_value = "")]
        version: String,
        /// npm, yarn or pnpm
        #[arg(long, default_value = "npm")]
        manager: PackageManager,
        #[arg(long, default_value = "")]
        url: String,
    },
    Bundle {
        name: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "0")]
        price: String,
        /// Create the bundle inactive
        #[arg(long)]
        inactive: bool,
        /// Template ids, repeatable
        #[arg(long = "template")]
        templates: Vec<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Commands that only make sense against the real backend.
fn remote(config: &ClientConfig) -> anyhow::Result<ApiClient> {
    if config.mock_mode {
        anyhow::bail!("This command needs the API; unset KICKSTARTR_MOCK_MODE");
    }
    ApiClient::new(config).context(
        "Failed to create API client. Set KICKSTARTR_API_URL (or API_URL)",
    )
}

fn publisher(config: &ClientConfig) -> anyhow::Result<Publisher> {
    let transport = transport_for(config).context("Failed to create upload transport")?;
    Ok(Publisher::new(transport).with_observer(Arc::new(TracingObserver)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if cli.mock {
        config = config.with_mock_mode(true);
    }

    match cli.command {
        Commands::Login { email, password } => {
            let client = remote(&config)?;
            client.login(&email, &password).await?;
            print_json(&serde_json::json!({
                "success": true,
                "session_cookie": client.session_cookie(),
            }))?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            remote(&config)?.register(&name, &email, &password).await?;
            print_json(&serde_json::json!({ "success": true }))?;
        }
        Commands::Logout => {
            remote(&config)?.logout().await?;
            print_json(&serde_json::json!({ "success": true }))?;
        }
        Commands::Me => {
            let user = Catalog::from_config(&config)?.current_user().await?;
            print_json(&user)?;
        }
        Commands::Profile => {
            let response = remote(&config)?.user_profile().await?;
            let profile = response
                .user_info
                .context("Not logged in. Run `kickstartr login` first")?;
            let active = profile.active_licenses().count();
            print_json(&serde_json::json!({
                "profile": profile,
                "active_licenses": active,
            }))?;
        }
        Commands::Templates { sub } => {
            let catalog = Catalog::from_config(&config)?;
            match sub {
                TemplateCommands::List { format } => {
                    let templates = catalog.templates().await?;
                    if format == "json" {
                        print_json(&templates)?;
                    } else {
                        for template in &templates {
                            println!("{}", template_row(template));
                        }
                    }
                }
                TemplateCommands::Get { id } => {
                    let template = catalog.template(&id).await?;
                    print_json(&serde_json::json!({
                        "template": &template,
                        "price": template.price_label(),
                        "latest_version": template.latest_version().map(|v| &v.version),
                        "versions": template.sorted_versions(),
                    }))?;
                }
            }
        }
        Commands::Bundles { sub } => {
            let catalog = Catalog::from_config(&config)?;
            match sub {
                BundleCommands::List { format } => {
                    let bundles = catalog.bundles().await?;
                    if format == "json" {
                        print_json(&bundles)?;
                    } else {
                        for bundle in &bundles {
                            println!("{}", bundle_row(bundle));
                        }
                    }
                }
                BundleCommands::Get { id } => {
                    print_json(&catalog.bundle(&id).await?)?;
                }
            }
        }
        Commands::Tags { sub } => match sub {
            TagCommands::Search { query } => {
                let picker = TagPicker::new(Catalog::from_config(&config)?.tags().await?);
                print_json(&picker.filter(&query))?;
            }
        },
        Commands::Comment {
            template_id,
            text,
            developer,
        } => {
            remote(&config)?
                .post_template_comment(&template_id, &text, developer)
                .await?;
            print_json(&serde_json::json!({ "success": true }))?;
        }
        Commands::Slug { text } => {
            println!("{}", slugify(&text));
        }
        Commands::Publish { sub } => publish(&config, sub).await?,
        Commands::Admin { sub } => admin(&config, sub).await?,
    }

    Ok(())
}

async fn publish(config: &ClientConfig, command: PublishCommands) -> anyhow::Result<()> {
    let catalog = Catalog::from_config(config)?;

    let (input_slug, version, file, metadata) = match command {
        PublishCommands::Template {
            name,
            file,
            version,
            slug,
            description,
            visibility,
            price,
            currency,
            tags,
        } => {
            let mut form = TemplateForm::new(catalog.tags().await?);
            form.set_name(&name);
            if let Some(slug) = slug {
                form.set_slug(&slug);
            }
            form.description = description;
            form.visibility = visibility;
            form.price = price;
            form.currency = currency;
            form.version = version;
            for tag in &tags {
                if !form.tags.add(tag) {
                    tracing::warn!(tag = %tag, "Tag ignored");
                }
            }
            form.zip_file = Some(load_archive(&file).await?);

            let request = form.to_request()?;
            let upload = form.upload_request();
            (
                upload.template_slug,
                upload.version,
                form.zip_file,
                RecordMetadata::Template(request),
            )
        }
        PublishCommands::Version {
            template_id,
            file,
            version,
            notes,
        } => {
            let mut form = TemplateVersionForm::new(catalog.templates().await?);
            form.select_template(&template_id);
            if form.selected_template().is_none() {
                anyhow::bail!("Template {} not found", template_id);
            }
            form.version = version;
            form.notes = notes;
            form.zip_file = Some(load_archive(&file).await?);

            let request = form.to_request()?;
            let upload = form
                .upload_request()
                .context("No template selected")?;
            (
                upload.template_slug,
                upload.version,
                form.zip_file,
                RecordMetadata::Version(request),
            )
        }
    };

    let published = publisher(config)?
        .publish_artifact(PublishInput {
            template_slug: input_slug,
            version,
            file: file.as_ref(),
            metadata,
        })
        .await
        .map_err(|err| publish_failure(&err))?;
    print_json(&published)
}

async fn admin(config: &ClientConfig, command: AdminCommands) -> anyhow::Result<()> {
    let client = remote(config)?;
    let created = match command {
        AdminCommands::Tag {
            name,
            slug,
            category,
        } => {
            let mut form = TagForm::default();
            form.set_name(&name);
            if let Some(slug) = slug {
                form.set_slug(&slug);
            }
            form.category = category;
            client.create_tag(&form.to_request()?).await?
        }
        AdminCommands::Package {
            name,
            version,
            manager,
            url,
        } => {
            let form = PackageForm {
                name,
                version,
                package_manager: manager,
                url,
            };
            client.create_package(&form.to_request()?).await?
        }
        AdminCommands::Bundle {
            name,
            slug,
            description,
            price,
            inactive,
            templates,
        } => {
            let mut form = BundleForm::default();
            form.set_name(&name);
            if let Some(slug) = slug {
                form.set_slug(&slug);
            }
            form.description = description;
            form.price = price;
            form.is_active = !inactive;
            for id in &templates {
                form.toggle_template(id);
            }
            client.create_bundle(&form.to_request()?).await?
        }
    };
    print_json(&created)
}
