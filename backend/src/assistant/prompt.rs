use crate::models::MonthlyRevenueSeries;
use crate::services::metrics::Metrics;

/// Months of revenue history included in the prompt.
pub const RECENT_MONTHS: usize = 5;

/// Build the prompt sent to the answer generator.
///
/// The prompt carries the latest monthly revenue, the cancellation rate and the
/// top booking countries so the generator can ground its answer in the data.
pub fn build_prompt(metrics: &Metrics, monthly_revenue: &MonthlyRevenueSeries, question: &str) -> String {
    let trend = monthly_revenue
        .tail(RECENT_MONTHS)
        .iter()
        .map(|(month, revenue)| format!("{}: {:.2}", month, revenue))
        .collect::<Vec<_>>()
        .join(", ");

    let countries = metrics
        .top_countries
        .iter()
        .map(|c| {
            let name = if c.country.is_empty() { "unknown" } else { c.country.as_str() };
            format!("{}: {}", name, c.bookings)
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an AI assistant analyzing hotel booking data.\n\
         Answer the query using this dataset:\n\
         \n\
         - Latest Revenue Trends: {trend}\n\
         - Cancellation Rate: {rate:.2}%\n\
         - Top Booking Countries: {countries}\n\
         \n\
         Now, answer this question: {question}",
        rate = metrics.cancellation_rate,
        question = question.trim(),
    )
}
