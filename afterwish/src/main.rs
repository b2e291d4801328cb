//! Afterwish command line

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use tracing::{error, info, warn};

use afterwish::{
    auth::{
        Identity, LocalIdentityProvider, LogNotifier, MemoryUserDirectory, SessionProvider,
        UserDirectory,
    },
    collection::{CategoryTag, CollectionEditor, ItemKind, SubscriptionDraft},
    config::{Args, Command, FormAction, SubscriptionAction, SubscriptionKind},
    db::{DocumentStore, MemoryStore, MongoClient, MongoStore, MongoUserDirectory},
    forms::{FormBinding, FormError},
    logging,
    records::AccessMode,
    AfterwishError, AppContext,
};
use afterwish_mail::{MailClient, MailConfig, PromptVariant, Tone};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        eprintln!("{}", e);
        std::process::exit(2);
    }

    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });

    if args.command.uses_mail() {
        return run_mail(&args).await;
    }

    info!("MongoDB: {} / {}", args.mongodb_uri, args.mongodb_db);
    let (store, directory) = connect(&args).await?;

    let notifier = Arc::new(LogNotifier::new(args.log_format));
    let provider = Arc::new(LocalIdentityProvider::new(directory, notifier));
    let mode = if args.strict_access {
        AccessMode::Strict
    } else {
        AccessMode::Lenient
    };
    let ctx = AppContext::new(store, SessionProvider::new(provider.clone()), mode);

    run(&args, &ctx, &provider).await
}

async fn connect(
    args: &Args,
) -> anyhow::Result<(Arc<dyn DocumentStore>, Arc<dyn UserDirectory>)> {
    match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            let store = MongoStore::new(&client)
                .await
                .context("preparing record collections")?;
            let directory = MongoUserDirectory::new(&client)
                .await
                .context("preparing user collection")?;
            info!("MongoDB connected successfully");
            let store: Arc<dyn DocumentStore> = Arc::new(store);
            let directory: Arc<dyn UserDirectory> = Arc::new(directory);
            Ok((store, directory))
        }
        Err(e) if args.dev_mode => {
            warn!("MongoDB connection failed (dev mode, using in-memory storage): {}", e);
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
            let directory: Arc<dyn UserDirectory> = Arc::new(MemoryUserDirectory::new());
            Ok((store, directory))
        }
        Err(e) => Err(e).context("connecting to MongoDB"),
    }
}

fn email(args: &Args) -> anyhow::Result<&str> {
    args.email.as_deref().context("no account email configured")
}

async fn sign_in(args: &Args, ctx: &AppContext) -> anyhow::Result<Identity> {
    let password = args
        .password
        .as_deref()
        .context("no account password configured")?;
    Ok(ctx.session().sign_in(email(args)?, password).await?)
}

async fn run(
    args: &Args,
    ctx: &AppContext,
    provider: &LocalIdentityProvider,
) -> anyhow::Result<()> {
    match &args.command {
        Command::SignUp => {
            let password = args.password.as_deref().context("no password given")?;
            let identity = ctx.session().sign_up(email(args)?, password).await?;
            println!("Account aangemaakt voor {} ({})", identity.email, identity.uid);
            println!("Bevestig je emailadres met de verificatiecode.");
        }
        Command::ResetPassword => {
            let email = email(args)?;
            ctx.session().request_password_reset(email).await?;
            println!("Als er een account bestaat voor {}, is er een resetcode verstuurd.", email);
        }
        Command::CompleteReset { code, new_password } => {
            provider
                .complete_password_reset(email(args)?, code, new_password)
                .await?;
            println!("Wachtwoord gewijzigd.");
        }
        Command::VerifyEmail { code } => {
            provider.confirm_email(email(args)?, code).await?;
            println!("Emailadres bevestigd.");
        }
        Command::Whoami => {
            let identity = sign_in(args, ctx).await?;
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Command::Practical { action } => {
            sign_in(args, ctx).await?;
            run_form(ctx.practical_info_form(), action).await?;
        }
        Command::Wishes { action } => {
            sign_in(args, ctx).await?;
            run_form(ctx.wish_list_form(), action).await?;
        }
        Command::Subscriptions { kind, action } => {
            sign_in(args, ctx).await?;
            match kind {
                SubscriptionKind::Business => {
                    run_subscriptions(ctx.business_subscriptions(), action).await?
                }
                SubscriptionKind::Private => {
                    run_subscriptions(ctx.private_subscriptions(), action).await?
                }
            }
        }
        Command::Draft { .. } | Command::Polish { .. } | Command::Assertive { .. } => {
            bail!("email commands do not use the record store")
        }
    }
    Ok(())
}

fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "ja".to_string(),
        Some(Value::Bool(false)) => "nee".to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn print_form(form: &FormBinding) {
    let mut section = "";
    for spec in form.schema().fields() {
        if !form.is_visible(spec.name) {
            continue;
        }
        if spec.section != section {
            section = spec.section;
            println!("\n{}", section);
        }
        let marker = if form.is_required(spec.name) { "*" } else { " " };
        println!("  {}{:<28} {}", marker, spec.name, display(form.value(spec.name)));
    }
}

async fn run_form(mut form: FormBinding, action: &FormAction) -> afterwish::Result<()> {
    form.mount().await;
    if let Some(err) = form.last_error() {
        return Err(AfterwishError::Internal(err.to_string()));
    }

    match action {
        FormAction::Show => print_form(&form),
        FormAction::Set { assignments } => {
            for (name, value) in assignments {
                form.set_text(name, value)?;
            }
            match form.submit().await {
                Ok(Some(stamp)) => println!(
                    "Opgeslagen op {}",
                    stamp.with_timezone(&chrono::Local).format("%d-%m-%Y %H:%M")
                ),
                Ok(None) => println!("Niet opgeslagen: niet ingelogd."),
                Err(FormError::Invalid(errors)) => {
                    for e in errors.first_per_section() {
                        println!("[{}] {}: {}", e.section, e.field, e.message);
                    }
                    return Err(FormError::Invalid(errors).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

fn parse_category<C: CategoryTag>(tag: &str) -> afterwish::Result<C> {
    C::parse(tag).ok_or_else(|| {
        let known: Vec<&str> = C::ALL.iter().map(|c| c.as_str()).collect();
        AfterwishError::Config(format!(
            "unknown category '{}' (choose from {})",
            tag,
            known.join(", ")
        ))
    })
}

fn selected<C: CategoryTag>(category: Option<&String>) -> afterwish::Result<Vec<C>> {
    Ok(match category {
        Some(tag) => vec![parse_category(tag)?],
        None => C::ALL.to_vec(),
    })
}

async fn run_subscriptions<K: ItemKind>(
    mut editor: CollectionEditor<K>,
    action: &SubscriptionAction,
) -> afterwish::Result<()> {
    editor.mount().await?;

    match action {
        SubscriptionAction::List { category } => {
            println!("{}", K::LABEL);
            for category in selected::<K::Category>(category.as_ref())? {
                let items = editor.filter_by_category(category);
                if items.is_empty() {
                    continue;
                }
                println!("\n{}", category.display_name());
                for item in items {
                    let check = if item.completed { "x" } else { " " };
                    println!("  [{}] {}  {} ({})", check, item.id, item.naam, item.provider);
                }
            }
        }
        SubscriptionAction::Add {
            category,
            name,
            provider,
            customer_number,
            phone,
            email,
            login,
            password,
            notes,
        } => {
            let mut draft = SubscriptionDraft::new(parse_category(category)?, name, provider);
            draft.klantnummer = customer_number.clone();
            draft.telefoon = phone.clone();
            draft.email = email.clone();
            draft.login = login.clone();
            draft.password = password.clone();
            draft.notities = notes.clone();

            let id = editor.add(draft).await?;
            println!("Toegevoegd met id {}", id);
        }
        SubscriptionAction::Toggle { id } => {
            let completed = editor.toggle_complete(id).await?;
            println!("{} is nu {}", id, if completed { "afgerond" } else { "open" });
        }
        SubscriptionAction::Remove { id } => {
            editor.remove(id).await?;
            println!("{} verwijderd", id);
        }
        SubscriptionAction::Progress => {
            for progress in editor.progress() {
                println!(
                    "{:<32} {}/{}",
                    progress.category.display_name(),
                    progress.completed,
                    progress.total
                );
            }
        }
        SubscriptionAction::Suggest { category } => {
            for category in selected::<K::Category>(category.as_ref())? {
                println!("{}: {}", category.display_name(), editor.suggestions(category).join(", "));
            }
        }
    }
    Ok(())
}

async fn run_mail(args: &Args) -> anyhow::Result<()> {
    let client = MailClient::new(MailConfig {
        base_url: args.mail.mail_base_url.clone(),
        api_key: args.mail.api_key.clone(),
        model: args.mail.mail_model.clone(),
        ..Default::default()
    })?;

    let variant = match &args.command {
        Command::Draft {
            notes,
            reply_to,
            tone,
        } => PromptVariant::Draft {
            notes: notes.clone(),
            replying_to: reply_to.clone(),
            tone: tone.parse::<Tone>()?,
        },
        Command::Polish { text } => PromptVariant::Polish {
            email: text.clone(),
        },
        Command::Assertive { text } => PromptVariant::Assertive {
            email: text.clone(),
        },
        _ => bail!("not an email command"),
    };

    let text = client.run(&variant).await?;
    println!("{}", text);
    Ok(())
}
