use clap::Parser;
use inline_checkout::application::orchestrator::CheckoutOrchestrator;
use inline_checkout::domain::config::{
    DATA_CREATE_URL, DATA_PUBLISHABLE_KEY, DATA_SUCCESS_URL, DATA_UPDATE_URL,
};
use inline_checkout::domain::intent::ConfirmPaymentResult;
use inline_checkout::domain::ports::{BackendBox, PaymentSdkBox};
use inline_checkout::infrastructure::http::HttpBackend;
use inline_checkout::infrastructure::in_memory::{PageEvent, RecordingPage};
use inline_checkout::infrastructure::simulated_sdk::SimulatedPaymentSdk;
use inline_checkout::interfaces::json::form_reader::FormDocument;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use url::Url;

/// Runs one inline checkout attempt against a storefront backend, with a
/// test-mode payment widget standing in for the hosted one.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Form description (JSON) with the values the shopper entered
    form: PathBuf,

    /// Storefront origin the endpoint paths are resolved against
    #[arg(long, env = "CHECKOUT_ORIGIN")]
    origin: String,

    /// Publishable key of the payment SDK
    #[arg(long, env = "CHECKOUT_PK")]
    pk: Option<String>,

    /// Create-intent endpoint
    #[arg(long, env = "CHECKOUT_CREATE_URL")]
    create_url: Option<String>,

    /// Update-intent endpoint (optional)
    #[arg(long, env = "CHECKOUT_UPDATE_URL")]
    update_url: Option<String>,

    /// Where to redirect after a successful payment
    #[arg(long, env = "CHECKOUT_SUCCESS_URL")]
    success_url: Option<String>,

    /// Cookie header of the storefront session (carries the csrftoken cookie)
    #[arg(long, env = "CHECKOUT_COOKIE")]
    cookie: Option<String>,

    /// Status the simulated widget reports on confirmation
    #[arg(long, default_value = "succeeded")]
    confirm_status: String,

    /// Make the simulated widget decline the payment with this message
    #[arg(long, conflicts_with = "confirm_status")]
    decline: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// The checkout root's data attributes as a page would carry them.
    fn dataset(&self) -> HashMap<String, String> {
        [
            (DATA_PUBLISHABLE_KEY, &self.pk),
            (DATA_CREATE_URL, &self.create_url),
            (DATA_UPDATE_URL, &self.update_url),
            (DATA_SUCCESS_URL, &self.success_url),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key.to_string(), value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file = File::open(&cli.form).into_diagnostic()?;
    let form = FormDocument::from_reader(file).into_diagnostic()?.into_form();
    let origin = Url::parse(&cli.origin).into_diagnostic()?;
    let backend: BackendBox = Box::new(HttpBackend::new(origin, cli.cookie.clone()));
    let page = RecordingPage::new();

    let script = match &cli.decline {
        Some(message) => Some(ConfirmPaymentResult::error(message)),
        None if cli.confirm_status != "succeeded" => {
            Some(ConfirmPaymentResult::with_status("", &cli.confirm_status))
        }
        None => None,
    };
    let sdk_loader = |publishable_key: &str| -> PaymentSdkBox {
        SimulatedPaymentSdk::with_results(publishable_key, script).boxed()
    };

    let orchestrator = CheckoutOrchestrator::bootstrap(
        &cli.dataset(),
        Some(sdk_loader),
        Box::new(form.clone()),
        Box::new(page.clone()),
        backend,
    )
    .await;

    if let Ok(orchestrator) = &orchestrator {
        orchestrator.start().await;
        orchestrator.on_submit().await;
    }

    for event in page.events().await {
        match event {
            PageEvent::Error(message) => println!("error: {message}"),
            PageEvent::Navigated(url) => println!("redirect: {url}"),
            PageEvent::SubmitEnabled(_) | PageEvent::Busy(_) => {}
        }
    }
    for report in form.reported().await {
        println!("invalid: {report}");
    }

    orchestrator.into_diagnostic().map(|_| ())
}
