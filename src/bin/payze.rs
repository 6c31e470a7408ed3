//! CLI tool for the Payze card-entry engine.
//!
//! # Usage
//!
//! ```bash
//! # Detect the brand of a (partial) card number
//! payze detect 9860
//!
//! # Format a card number the way the input field shows it
//! payze format 378282246310005
//!
//! # Validate a card number, CVV, expiry or cardholder name
//! payze validate 4532015112830366 --output json
//! payze cvv 1234 --brand amex
//! payze expiry 12/2099
//! payze holder "Jane Doe"
//!
//! # Check whether a step-up redirect ends the flow
//! payze redirect https://paygate.payze.uz/success
//!
//! # Pay a transaction against the sandbox
//! payze pay --transaction-id tx-1 --number 4532015112830366 \
//!     --holder "Jane Doe" --expiry 12/2099 --cvv 123
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use payze::config::DEFAULT_GATEWAY_HOSTS;
use payze::holder::{validate_card_holder_with, HolderNameRule};
use payze::redirect::RedirectClassifier;
use payze::{classify, cvv, expiry, format, luhn, mask, validate_card_number, CardBrand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "payze")]
#[command(author, version, about = "Payment card entry engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the card brand from a (partial) number
    Detect {
        /// Bin or full card number
        bin: String,
    },

    /// Format a card number with the brand's grouping
    Format {
        /// Card number to format
        card_number: String,

        /// Brand to format for (detected when omitted)
        #[arg(short, long)]
        brand: Option<BrandArg>,
    },

    /// Validate a card number
    Validate {
        /// Card number to validate (spaces allowed)
        card_number: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Validate a CVV for a brand
    Cvv {
        /// CVV to validate
        cvv: String,

        /// Card brand (affects required length)
        #[arg(short, long)]
        brand: Option<BrandArg>,
    },

    /// Validate an expiration date (MM/YYYY)
    Expiry {
        /// Expiration date
        date: String,
    },

    /// Validate a cardholder name
    Holder {
        /// Name on the card
        name: String,

        /// Require first and last name
        #[arg(long)]
        two_tokens: bool,
    },

    /// Check whether a card number passes the Luhn algorithm
    Luhn {
        /// Card number to check
        card_number: String,
    },

    /// Mask a card number, keeping the last four digits
    Mask {
        /// Card number to mask
        card_number: String,
    },

    /// Classify a step-up web view redirect
    Redirect {
        /// URL the web view navigated to
        url: String,

        /// Gateway hosts to accept (defaults to the Payze hosts)
        #[arg(long = "host")]
        hosts: Vec<String>,
    },

    /// Pay a transaction through the hosted gateway
    Pay(pay::PayArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum BrandArg {
    Visa,
    Mastercard,
    Amex,
    Humo,
    Uzcard,
}

impl From<BrandArg> for CardBrand {
    fn from(arg: BrandArg) -> Self {
        match arg {
            BrandArg::Visa => CardBrand::Visa,
            BrandArg::Mastercard => CardBrand::Mastercard,
            BrandArg::Amex => CardBrand::Amex,
            BrandArg::Humo => CardBrand::Humo,
            BrandArg::Uzcard => CardBrand::UzCard,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { bin } => cmd_detect(&bin),
        Commands::Format { card_number, brand } => cmd_format(&card_number, brand.map(Into::into)),
        Commands::Validate {
            card_number,
            output,
        } => cmd_validate(&card_number, output),
        Commands::Cvv {
            cvv: cvv_input,
            brand,
        } => cmd_cvv(&cvv_input, brand.map(Into::into)),
        Commands::Expiry { date } => cmd_expiry(&date),
        Commands::Holder { name, two_tokens } => cmd_holder(&name, two_tokens),
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Mask { card_number } => println!("{}", mask::mask_number(&card_number)),
        Commands::Redirect { url, hosts } => cmd_redirect(&url, hosts),
        Commands::Pay(args) => pay::run(args).await,
    }
}

fn detected(card_number: &str) -> Option<CardBrand> {
    classify(card_number).ok().flatten()
}

fn cmd_detect(bin: &str) {
    match classify(bin) {
        Ok(Some(brand)) => {
            println!("Brand: {}", brand.name());
            println!("Format: {}", brand.display_format());
            match brand.cvv_length() {
                Some(length) => println!("CVV: {} digits", length),
                None => println!("CVV: none"),
            }
        }
        Ok(None) => {
            println!("Brand: unknown");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_format(card_number: &str, brand: Option<CardBrand>) {
    let brand = brand.or_else(|| detected(card_number));
    println!("{}", format::format_card_number(card_number, brand));
}

fn cmd_validate(card_number: &str, output: OutputFormat) {
    let brand = detected(card_number);
    let result = validate_card_number(card_number, brand);

    match output {
        OutputFormat::Text => match &result {
            Ok(()) => {
                println!("Valid: yes");
                println!("Brand: {}", brand.map_or("unknown", |b| b.name()));
                println!("Masked: {}", mask::mask_number(card_number));
            }
            Err(e) => {
                println!("Valid: no");
                println!("Error: {}", e);
            }
        },
        OutputFormat::Json => {
            let body = match &result {
                Ok(()) => serde_json::json!({
                    "valid": true,
                    "brand": brand,
                    "masked": mask::mask_number(card_number),
                }),
                Err(e) => serde_json::json!({
                    "valid": false,
                    "error": e.to_string(),
                }),
            };
            println!("{:#}", body);
        }
    }

    std::process::exit(if result.is_ok() { 0 } else { 1 });
}

fn cmd_cvv(cvv_input: &str, brand: Option<CardBrand>) {
    match cvv::validate_cvv(cvv_input, brand) {
        Ok(()) => println!("Valid: yes"),
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_expiry(date: &str) {
    match expiry::validate_expiry(date) {
        Ok(exp) => {
            println!("Valid: yes");
            println!("Month: {:02}", exp.month());
            println!("Year: {}", exp.year());
            if let Some(submission) = expiry::to_submission_format(date) {
                println!("Submitted as: {}", submission);
            }
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_holder(name: &str, two_tokens: bool) {
    let rule = if two_tokens {
        HolderNameRule::TwoTokens
    } else {
        HolderNameRule::AnyLetter
    };

    match validate_card_holder_with(name, rule) {
        Ok(()) => println!("Valid: yes"),
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_luhn(card_number: &str) {
    if luhn::passes_str(&format::strip_whitespace(card_number)) {
        println!("Luhn: pass");
    } else {
        println!("Luhn: fail");
        std::process::exit(1);
    }
}

fn cmd_redirect(url: &str, hosts: Vec<String>) {
    let classifier = if hosts.is_empty() {
        RedirectClassifier::new(DEFAULT_GATEWAY_HOSTS)
    } else {
        RedirectClassifier::new(hosts)
    };

    match classifier.classify_str(url) {
        Some(completion) => println!("Terminating: {}", completion),
        None => println!("Intermediate: ignored"),
    }
}

mod pay {
    use clap::{Args, ValueEnum};
    use payze::config::{Configuration, ServiceEnvironment};
    use payze::{
        CardForm, CompletionHandler, HttpGateway, PaymentCompletion, PaymentOutcome,
        PaymentSession, SessionEvent,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

    const BRAND_WAIT: Duration = Duration::from_secs(2);

    #[derive(Clone, Copy, ValueEnum)]
    pub enum EnvironmentArg {
        Development,
        Production,
    }

    #[derive(Args)]
    pub struct PayArgs {
        /// Transaction to pay
        #[arg(long)]
        transaction_id: String,

        /// Card number
        #[arg(long)]
        number: String,

        /// Name on the card
        #[arg(long)]
        holder: String,

        /// Expiration date (MM/YYYY)
        #[arg(long)]
        expiry: String,

        /// CVV (omit for Humo and UzCard)
        #[arg(long, default_value = "")]
        cvv: String,

        /// Gateway environment
        #[arg(long, default_value = "development")]
        environment: EnvironmentArg,

        /// JSON configuration file (overrides --environment)
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    }

    fn configuration(args: &PayArgs) -> Result<Configuration, String> {
        match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
                Configuration::from_json(&json).map_err(|e| e.to_string())
            }
            None => Ok(Configuration::new(match args.environment {
                EnvironmentArg::Development => ServiceEnvironment::Development,
                EnvironmentArg::Production => ServiceEnvironment::Production,
            })),
        }
    }

    pub async fn run(args: PayArgs) {
        if let Err(e) = pay(args).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    async fn pay(args: PayArgs) -> Result<(), String> {
        let configuration = configuration(&args)?;
        let gateway = Arc::new(HttpGateway::from_configuration(&configuration).map_err(|e| e.to_string())?);

        let (session, mut events) = PaymentSession::builder(args.transaction_id.clone(), configuration)
            .gateway(gateway.clone())
            .details(gateway)
            .on_completion(CompletionHandler::single(|completion| {
                println!("Completed: {}", completion);
            }))
            .build()
            .map_err(|e| e.to_string())?;

        let amount = session.load_details().await.map_err(|e| e.to_string())?;
        println!("Amount: {}", amount);

        session.number_did_update(&args.number);
        let brand = tokio::time::timeout(BRAND_WAIT, async {
            while let Some(event) = events.recv().await {
                if let SessionEvent::BrandChanged(brand) = event {
                    return brand;
                }
            }
            None
        })
        .await
        .ok()
        .flatten();
        println!("Brand: {}", brand.map_or("unknown", |b| b.name()));

        let form = CardForm::new(args.number, args.holder, args.expiry, args.cvv);
        match session.submit(&form).await.map_err(|e| e.to_string())? {
            PaymentOutcome::StepUpRequired(url) => {
                println!("Step-up required: {}", url);
                println!("Paste each URL the browser visits, one per line:");
                follow_step_up(&session, BufReader::new(tokio::io::stdin())).await?;
            }
            PaymentOutcome::Accepted | PaymentOutcome::Rejected => {}
        }

        if !session.state().is_completed() {
            session.cancel();
        }
        Ok(())
    }

    /// Feeds navigated URLs to the session until one ends the step-up.
    pub async fn follow_step_up<R>(
        session: &PaymentSession,
        input: R,
    ) -> Result<Option<PaymentCompletion>, String>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? {
            if let Some(completion) = session.web_view_did_navigate(line.trim()) {
                return Ok(Some(completion));
            }
        }
        Ok(None)
    }

}
