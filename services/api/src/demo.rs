use crate::infra::{
    demo_listings, demo_user, ConsoleModalHost, ConsoleNotificationSink, InMemoryListingGateway,
};
use clap::Args;
use listing_studio::config::AppConfig;
use listing_studio::error::AppError;
use listing_studio::telemetry;
use listing_studio::workflows::listings::{
    Listing, ListingModalController, ListingWorkflowError, ModalContext, ModalIntent, ModalView,
    Session,
};
use std::sync::Arc;

const DEFAULT_DEMO_TITLE: &str = "Sunny Loft by the Park";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run the walkthrough without a signed-in host.
    #[arg(long)]
    pub(crate) logged_out: bool,
    /// Duplicate this listing id instead of creating a blank listing.
    #[arg(long)]
    pub(crate) duplicate: Option<String>,
    /// Listing title to type into the form.
    #[arg(long)]
    pub(crate) name: Option<String>,
}

type DemoController =
    ListingModalController<InMemoryListingGateway, ConsoleNotificationSink, ConsoleModalHost>;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        logged_out,
        duplicate,
        name,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let listings = demo_listings();
    let session = if logged_out {
        Session::Anonymous
    } else {
        Session::LoggedIn(demo_user())
    };

    let gateway = Arc::new(InMemoryListingGateway::seeded(listings.clone()));
    let controller: DemoController = ListingModalController::new(
        gateway.clone(),
        Arc::new(ConsoleNotificationSink::default()),
        Arc::new(ConsoleModalHost),
        ModalContext::new(session, listings),
    )
    .with_defaults(config.listings);

    println!("Listing modal demo");
    step(&controller, ModalIntent::Open, "Modal opened").await?;

    let outcome = match duplicate {
        Some(source_id) => {
            step(&controller, ModalIntent::SwitchToCopy, "Switched to copy mode").await?;
            step(
                &controller,
                ModalIntent::SelectSource(source_id),
                "Source listing selected",
            )
            .await?;
            if let Some(name) = name {
                step(&controller, ModalIntent::EditName(name), "Title edited").await?;
            }
            controller.dispatch(ModalIntent::Submit).await
        }
        None => {
            let name = name.unwrap_or_else(|| DEFAULT_DEMO_TITLE.to_string());
            step(&controller, ModalIntent::EditName(name), "Title entered").await?;
            controller.dispatch(ModalIntent::Submit).await
        }
    };

    match outcome {
        Ok(Some(listing)) => render_listing(&listing),
        Ok(None) => {}
        Err(err) => println!("\nSubmission not completed: {err}"),
    }

    println!("\nAfter submission");
    render_view(&controller.view());

    println!("\nStored listings");
    for listing in gateway.listings() {
        println!("- {} | {}", listing.id, listing.name);
    }

    if let Some(user) = controller.context().session.user() {
        let tasks = gateway.completed_tasks(&user.id);
        let recorded = if tasks.is_empty() {
            "none".to_string()
        } else {
            tasks.into_iter().collect::<Vec<_>>().join(", ")
        };
        println!("\nProfile tasks recorded for {}: {recorded}", user.id);
    }

    Ok(())
}

async fn step(
    controller: &DemoController,
    intent: ModalIntent,
    caption: &str,
) -> Result<(), ListingWorkflowError> {
    controller.dispatch(intent).await?;
    println!("\n{caption}");
    render_view(&controller.view());
    Ok(())
}

fn render_view(view: &ModalView) {
    if !view.visible {
        println!("  (modal hidden)");
        return;
    }

    println!("  {} - {}", view.header.title, view.header.subtitle);

    if let Some(picker) = &view.source_picker {
        println!("  {}:", picker.label);
        if !picker.options.iter().any(|option| option.selected) {
            println!("    > {}", picker.placeholder);
        }
        for option in &picker.options {
            let marker = if option.selected { '>' } else { ' ' };
            println!("    {marker} {} ({})", option.label, option.id);
        }
    }

    let input = &view.name_input;
    let value = if input.value.is_empty() {
        format!("<{}>", input.placeholder)
    } else {
        input.value.clone()
    };
    println!("  {}: {value}", input.label);
    println!("    {}", input.helper_text);

    let buttons: Vec<String> = view
        .actions
        .iter()
        .map(|button| {
            if button.enabled {
                format!("[{}]", button.label)
            } else {
                format!("[{} (disabled)]", button.label)
            }
        })
        .collect();
    println!("  {}", buttons.join(" "));
}

fn render_listing(listing: &Listing) {
    println!("\nCreated listing {}", listing.id);
    println!("  Title: {}", listing.name);
    println!(
        "  Host: {} <{}> (landlord {})",
        listing.host_name, listing.host_email, listing.host_landlord_id
    );
    println!(
        "  Deposit: {} | Beds: {} | Active: {}",
        listing.damage_deposit, listing.qty_beds, listing.active
    );
    let nights: String = listing
        .nights_available
        .iter()
        .map(|night| night.single_letter())
        .collect();
    println!("  Nights available: {nights}");
    if let Some(source) = &listing.duplicated_from {
        println!("  Duplicated from: {source}");
    }
}
