use crate::infra::{default_schedule, InMemoryDealStore, InMemoryNudgeBoard};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use partner_ops::error::AppError;
use partner_ops::hubspot::HubSpotDealImporter;
use partner_ops::pipeline::{
    Deal, DealFilter, FunnelInsights, FunnelReport, FunnelSummary, LeadSubmission, PartnerKind,
    PartnerPipelineService, Product, Stage, TransitionPolicy, Vertical,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct FunnelReportArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional HubSpot deal export to hydrate the book
    #[arg(long)]
    pub(crate) hubspot_csv: Option<PathBuf>,
    /// Partner kind assumed for imported deals
    #[arg(long, default_value = "referral", value_parser = crate::infra::parse_partner_kind)]
    pub(crate) partner_kind: PartnerKind,
    /// Days without movement before a deal counts as stalled
    #[arg(long, default_value_t = 14)]
    pub(crate) stalled_after_days: i64,
    /// Include the full deal listing in the output
    #[arg(long)]
    pub(crate) list_deals: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include the full deal listing in the demo output
    #[arg(long)]
    pub(crate) list_deals: bool,
}

type DemoService = PartnerPipelineService<InMemoryDealStore, InMemoryNudgeBoard>;

fn build_demo_service() -> (DemoService, Arc<InMemoryNudgeBoard>) {
    let store = Arc::new(InMemoryDealStore::default());
    let nudges = Arc::new(InMemoryNudgeBoard::default());
    let service = PartnerPipelineService::new(
        store,
        nudges.clone(),
        default_schedule(),
        TransitionPolicy::Unrestricted,
    );
    (service, nudges)
}

fn report_timestamp(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

pub(crate) fn run_funnel_report(args: FunnelReportArgs) -> Result<(), AppError> {
    let FunnelReportArgs {
        today,
        hubspot_csv,
        partner_kind,
        stalled_after_days,
        list_deals,
    } = args;

    let now = report_timestamp(today);
    let (service, _nudges) = build_demo_service();

    let imported = if let Some(path) = hubspot_csv {
        let leads = HubSpotDealImporter::from_path(path, partner_kind)?;
        let count = leads.len();
        for lead in leads {
            let deal = service.submit_lead(lead.submission, "HubSpot import", now)?;
            if lead.stage != Stage::Prospecting {
                service.advance_stage(&deal.id, lead.stage, "HubSpot import", now)?;
            }
        }
        Some(count)
    } else {
        seed_sample_book(&service, now)?;
        None
    };

    let book = service.search(&DealFilter::default())?;
    let report = FunnelReport::build(&book, now, stalled_after_days);
    let summary = report.summary();
    let insights = summary.insights();

    match imported {
        Some(count) => println!("Pipeline funnel ({count} deal(s) imported from HubSpot)"),
        None => println!("Pipeline funnel (sample book)"),
    }
    render_funnel(&summary, &insights, &book, list_deals);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, list_deals } = args;
    let now = report_timestamp(today);

    println!("Partner pipeline demo");

    let (service, nudges) = build_demo_service();

    let aurora = service.submit_lead(
        LeadSubmission {
            brand_name: "Aurora Threads".to_string(),
            partner_kind: PartnerKind::Referral,
            monthly_gmv: 500_000,
            product: Product::Checkout,
            vertical: Vertical::Fashion,
            notes: "Met at the commerce summit".to_string(),
        },
        "Nova Partners",
        now,
    )?;
    println!("- Submitted {} ({})", aurora.brand_name, aurora.id);

    service.advance_stage(&aurora.id, Stage::Pitch, "Nova Partners", now)?;
    let agreement = service.advance_stage(
        &aurora.id,
        Stage::BusinessAgreementShared,
        "Nova Partners",
        now,
    )?;
    println!("- Moved {} to Business Agreement Shared", aurora.brand_name);
    if let Some(nudge) = &agreement.nudge {
        println!(
            "  -> nudge [{}] {} (action: {})",
            nudge.priority.label(),
            nudge.message,
            nudge.action_label
        );
    }

    let quote = service.quote(&aurora.id)?;
    println!(
        "  -> projected commission {:.2} ({})",
        quote.amount, quote.formula
    );

    let beacon = service.submit_lead(
        LeadSubmission {
            brand_name: "Beacon Integrations".to_string(),
            partner_kind: PartnerKind::Service,
            monthly_gmv: 0,
            product: Product::AllProducts,
            vertical: Vertical::Other,
            notes: "Integration-only engagement".to_string(),
        },
        "Beacon Digital",
        now,
    )?;
    service.advance_stage(&beacon.id, Stage::Signed, "Beacon Digital", now)?;
    let live = service.advance_stage(&beacon.id, Stage::GoLive, "Beacon Digital", now)?;
    println!(
        "- {} went live; fixed incentive earned {:.2}",
        beacon.brand_name, live.deal.commission_earned
    );

    service.submit_lead(
        LeadSubmission {
            brand_name: "Fern & Forage".to_string(),
            partner_kind: PartnerKind::Referral,
            monthly_gmv: 80_000,
            product: Product::ReturnsManagement,
            vertical: Vertical::Food,
            notes: String::new(),
        },
        "Nova Partners",
        now,
    )?;

    let board = nudges.list();
    println!("\nOpen nudges: {}", board.len());
    for nudge in &board {
        println!("  - [{}] {}", nudge.priority.label(), nudge.message);
    }

    let book = service.search(&DealFilter::default())?;
    let report = FunnelReport::build(&book, now, 14);
    let summary = report.summary();
    let insights = summary.insights();
    render_funnel(&summary, &insights, &book, list_deals);

    Ok(())
}

fn seed_sample_book(service: &DemoService, now: DateTime<Utc>) -> Result<(), AppError> {
    let samples = [
        (
            "Aurora Threads",
            PartnerKind::Referral,
            500_000,
            Product::Checkout,
            Vertical::Fashion,
            Some(Stage::BusinessAgreementShared),
        ),
        (
            "Nimbus Audio",
            PartnerKind::Reseller,
            250_000,
            Product::Engagement,
            Vertical::Electronics,
            Some(Stage::Signed),
        ),
        (
            "Fern & Forage",
            PartnerKind::Referral,
            80_000,
            Product::ReturnsManagement,
            Vertical::Food,
            None,
        ),
        (
            "Hearth & Home Co",
            PartnerKind::Reseller,
            120_000,
            Product::AllProducts,
            Vertical::Home,
            Some(Stage::Lost),
        ),
    ];

    for (brand, kind, gmv, product, vertical, stage) in samples {
        let deal = service.submit_lead(
            LeadSubmission {
                brand_name: brand.to_string(),
                partner_kind: kind,
                monthly_gmv: gmv,
                product,
                vertical,
                notes: String::new(),
            },
            "Nova Partners",
            now,
        )?;
        if let Some(stage) = stage {
            service.advance_stage(&deal.id, stage, "Nova Partners", now)?;
        }
    }

    Ok(())
}

fn render_funnel(
    summary: &FunnelSummary,
    insights: &FunnelInsights,
    book: &[Deal],
    list_deals: bool,
) {
    println!(
        "\nBook: {} deal(s) | {} signed or live | {} lost",
        summary.total_deals, summary.signed_or_live, summary.lost
    );
    for entry in &summary.stages {
        println!(
            "  {:<26} {:>3} deal(s) | GMV {:>12}",
            entry.stage_label, entry.deals, entry.gmv
        );
    }
    println!(
        "Commission: {:.2} earned | {:.2} pending",
        summary.commission_earned, summary.commission_pending
    );

    if !summary.stalled.is_empty() {
        println!("Stalled deals:");
        for stalled in &summary.stalled {
            println!(
                "  - {} ({}) idle {} day(s)",
                stalled.brand_name, stalled.stage_label, stalled.days_idle
            );
        }
    }

    println!("Insights:");
    for observation in &insights.observations {
        println!("  - {observation}");
    }
    if let Some(focus) = insights.focus_stage {
        println!("  - focus stage: {focus}");
    }
    if !insights.recommended_actions.is_empty() {
        println!("Recommended actions:");
        for action in &insights.recommended_actions {
            println!("  - {action}");
        }
    }

    if list_deals {
        println!("Deals:");
        for deal in book {
            println!(
                "  - {} {} [{}] GMV {} | earned {:.2} | pending {:.2}",
                deal.id,
                deal.brand_name,
                deal.stage.label(),
                deal.monthly_gmv,
                deal.commission_earned,
                deal.commission_pending
            );
        }
    }
}
