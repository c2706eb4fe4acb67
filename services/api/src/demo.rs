use crate::infra::{format_inr, parse_score};
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;
use trust_score::error::AppError;
use trust_score::ledger::{recent_transactions, Direction, ImportBatch, TransactionImporter};
use trust_score::lending::{suggested_amount, LoanApplication, LoanPurpose};
use trust_score::scoring::{ScoreEngine, ScoreResult, DEFAULT_RECENT_LIMIT};

const SAMPLE_SUBJECT: &str = "user@upi";

/// Two weeks of UPI activity around one subject, including third-party
/// transfers, failures and a self-transfer.
const SAMPLE_STATEMENT: &str = "\
Timestamp,Sender UPI ID,Receiver UPI ID,Amount (INR),Status,Type,To Type
2025-01-01T09:00:00,user@upi,alice@upi,1000,SUCCESS,Sent,P2P
2025-01-01T10:00:00,alice@upi,bob@upi,500,SUCCESS,Sent,P2P
2025-01-01T11:15:00,charlie@upi,user@upi,100,SUCCESS,Sent,P2P
2025-01-02T09:30:00,user@upi,merchant@upi,250,SUCCESS,Sent,P2M
2025-01-02T12:00:00,user@upi,alice@upi,300,FAILED,Sent,P2P
2025-01-02T14:00:00,alice@upi,user@upi,300,SUCCESS,Sent,P2P
2025-01-03T08:00:00,bob@upi,alice@upi,200,SUCCESS,Sent,P2P
2025-01-04T10:00:00,employer@upi,user@upi,15000,SUCCESS,Received,P2P
2025-01-05T09:30:00,user@upi,merchant@upi,700,SUCCESS,Sent,P2M
2025-01-06T18:00:00,user@upi,grocer@upi,400,PENDING,Sent,P2M
2025-01-07T10:00:00,merchant@upi,user@upi,80,SUCCESS,Incentive,P2P
2025-01-08T09:00:00,user@upi,merchant@upi,999,SUCCESS,Sent,P2M
2025-01-08T11:00:00,merchant@upi,user@upi,200,SUCCESS,Refund,P2P
2025-01-09T08:00:00,david@upi,charlie@upi,350,SUCCESS,Sent,P2P
2025-01-10T10:00:00,user@upi,user@upi,0,SUCCESS,Self-Transfer,P2P
2025-01-10T11:00:00,charlie@upi,bob@upi,100,FAILED,Sent,P2P
2025-01-11T09:00:00,user@upi,grocer@upi,120,SUCCESS,Sent,P2M
2025-01-12T10:30:00,david@upi,user@upi,450,SUCCESS,Sent,P2P
2025-01-13T19:45:00,user@upi,bob@upi,350,SUCCESS,Sent,P2P
2025-01-14T08:15:00,user@upi,merchant@upi,abc,SUCCESS,Sent,P2M
";

pub(crate) fn sample_statement_csv() -> &'static str {
    SAMPLE_STATEMENT
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Subject handle to score within the sample statement
    #[arg(long)]
    pub(crate) subject: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Transaction export to score (.json or .csv)
    #[arg(long)]
    pub(crate) transactions: PathBuf,
    /// Payment handle of the subject being scored
    #[arg(long)]
    pub(crate) subject: String,
    /// Previously reported score, used to show the change
    #[arg(long, value_parser = parse_score)]
    pub(crate) prior_score: Option<u16>,
    /// Number of recent transactions to list
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    pub(crate) recent: usize,
    /// Print the full result as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Trust score the quote is priced for
    #[arg(long, value_parser = parse_score)]
    pub(crate) score: u16,
    /// Requested principal in INR
    #[arg(long)]
    pub(crate) amount: f64,
    /// Repayment term in months
    #[arg(long)]
    pub(crate) term: u32,
    /// Loan purpose, e.g. "Education" or "vehicle"
    #[arg(long)]
    pub(crate) purpose: LoanPurpose,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        transactions,
        subject,
        prior_score,
        recent,
        json,
    } = args;

    let batch = TransactionImporter::for_subject(&subject).from_path(&transactions)?;
    let result = ScoreEngine::with_defaults().score_batch(&batch, &subject, prior_score);

    if json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_score_report(&subject, &batch, &result, recent);
    }
    Ok(())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let terms = ScoreEngine::with_defaults().eligibility_for(args.score, 0.0);
    let application = LoanApplication {
        amount: args.amount,
        term_months: args.term,
        purpose: Some(args.purpose),
    };
    let quote = application.quote(&terms)?;

    println!("Loan quote for score {}", args.score);
    println!(
        "- {} over {} months for {} at {:.2}%",
        format_inr(quote.amount),
        quote.term_months,
        quote.purpose,
        quote.interest_rate
    );
    println!("- EMI {} per month", format_inr(quote.monthly_emi));
    println!(
        "- Total repayment {} (interest {})",
        format_inr(quote.total_repayment),
        format_inr(quote.total_interest)
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let subject = args.subject.unwrap_or_else(|| SAMPLE_SUBJECT.to_string());

    println!("Trust score demo");
    let batch =
        TransactionImporter::for_subject(&subject).from_csv_reader(Cursor::new(SAMPLE_STATEMENT))?;
    let result = ScoreEngine::with_defaults().score_batch(&batch, &subject, None);
    render_score_report(&subject, &batch, &result, DEFAULT_RECENT_LIMIT);

    let terms = &result.loan_eligibility;
    if !terms.eligible {
        println!("\nNo loan offer: score is below the eligibility threshold.");
        return Ok(());
    }

    let application = LoanApplication {
        amount: suggested_amount(terms.max_amount),
        term_months: terms.max_duration_months,
        purpose: Some(LoanPurpose::Education),
    };
    let quote = application.quote(terms)?;
    println!("\nSuggested loan");
    println!(
        "- {} for {} over {} months",
        format_inr(quote.amount),
        quote.purpose,
        quote.term_months
    );
    println!(
        "- EMI {} | total repayment {}",
        format_inr(quote.monthly_emi),
        format_inr(quote.total_repayment)
    );
    Ok(())
}

fn render_score_report(subject: &str, batch: &ImportBatch, result: &ScoreResult, recent: usize) {
    let insights = result.insights();

    println!("\nSubject {subject}");
    println!("Score {} ({})", result.score, result.category);
    if let Some(change) = result.score_change {
        println!("Change since last report: {change:+}");
    }
    println!("{}", insights.message);

    let components = &result.components;
    println!("\nComponents");
    println!("- Payment history: {}", components.payment_history);
    println!("- Credit utilization: {}", components.credit_utilization);
    println!("- Credit age: {}", components.credit_age);
    println!("- UPI activity: {}", components.upi_activity);
    println!("- Transaction patterns: {}", components.transaction_patterns);

    let activity = &result.activity;
    println!("\nActivity");
    println!(
        "- {} successful | {} failed or pending | {} ignored | {} skipped",
        activity.successful,
        activity.failed_or_pending,
        activity.third_party_ignored,
        activity.skipped_records
    );
    println!(
        "- Avg monthly inflow {} | outflow {}",
        format_inr(activity.avg_monthly_incoming),
        format_inr(activity.avg_monthly_outgoing)
    );
    if let (Some(first), Some(last)) = (activity.first_activity, activity.last_activity) {
        println!(
            "- Active from {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }

    let terms = &result.loan_eligibility;
    println!("\nLoan eligibility");
    if terms.eligible {
        println!(
            "- Up to {} over {} months at {:.2}% (EMI {})",
            format_inr(terms.max_amount),
            terms.max_duration_months,
            terms.interest_rate,
            format_inr(terms.monthly_emi)
        );
    } else {
        println!("- Not eligible");
    }
    println!(
        "- Disposable income {} per month",
        format_inr(terms.disposable_income)
    );

    let listing = recent_transactions(&batch.records, subject, recent);
    if !listing.is_empty() {
        println!("\nRecent transactions");
        for record in listing {
            let sign = match record.direction_for(subject) {
                Direction::Outgoing => "-",
                Direction::Incoming => "+",
                Direction::SelfTransfer | Direction::ThirdParty => " ",
            };
            println!(
                "- {} {}{} {} -> {} [{}]",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                sign,
                format_inr(record.amount),
                record.sender_id,
                record.receiver_id,
                record.status.label()
            );
        }
    }

    println!("\nSuggestions");
    for suggestion in insights.suggestions {
        println!("- {suggestion}");
    }
}
