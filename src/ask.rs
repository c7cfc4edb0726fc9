use analytics::CalculationRequest;

/// Maps a plain-English business question onto metric requests by keyword.
///
/// Every rule that matches contributes a request, in a fixed order, and duplicates
/// are dropped. An empty result means nothing matched. Rankings use `default_limit`
/// unless the question asks for a top ten.
pub fn route(question: &str, default_limit: usize) -> Vec<CalculationRequest> {
    let q = question.to_lowercase();
    let has = |word: &str| q.contains(word);
    let request = |metric: &str| CalculationRequest::new(metric).with_limit(default_limit);
    let mut requests = Vec::new();

    if has("revenue") && has("total") {
        requests.push(request("total_revenue"));
    }
    if has("top") && has("product") {
        let limit = if has("top 10") || has("top ten") { 10 } else { default_limit };
        requests.push(request("top_products").with_limit(limit));
    }
    if has("growth") {
        requests.push(request("growth_rate"));
    }
    if has("customer") {
        requests.push(request("customer_count"));
    }
    if has("region") && has("top") {
        requests.push(request("top_regions"));
    }
    if has("q1") || has("quarter 1") {
        requests.push(request("total_revenue").with_period("Q1"));
    }
    if has("channel") {
        requests.push(request("revenue_by_channel"));
    }
    if has("monthly") || has("by month") {
        requests.push(request("monthly_revenue"));
    }
    if has("average order") {
        requests.push(request("average_order_value"));
    }
    if has("transactions") {
        requests.push(request("total_transactions"));
    }

    let mut unique: Vec<CalculationRequest> = Vec::with_capacity(requests.len());
    for request in requests {
        if !unique.contains(&request) {
            unique.push(request);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(question: &str) -> Vec<String> {
        route(question, 5).into_iter().map(|r| r.metric).collect()
    }

    #[test]
    fn total_revenue_question() {
        assert_eq!(metrics("What is our total revenue?"), vec!["total_revenue"]);
    }

    #[test]
    fn top_products_limit_follows_wording() {
        let requests = route("Show me the top 5 products by revenue", 5);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].metric, "top_products");
        assert_eq!(requests[0].limit, 5);

        let requests = route("Top ten products please", 5);
        assert_eq!(requests[0].limit, 10);
    }

    #[test]
    fn growth_question() {
        assert_eq!(metrics("What is our month-over-month growth rate?"), vec!["growth_rate"]);
    }

    #[test]
    fn q1_revenue_is_filtered() {
        let requests = route("What was our Q1 revenue?", 5);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].metric, "total_revenue");
        assert_eq!(requests[0].period, "Q1");
    }

    #[test]
    fn several_rules_can_match() {
        assert_eq!(
            metrics("Top regions and unique customers by channel"),
            vec!["customer_count", "top_regions", "revenue_by_channel"]
        );
    }

    #[test]
    fn unmatched_question_routes_nowhere() {
        assert!(route("How is the weather?", 5).is_empty());
    }

    #[test]
    fn rankings_follow_the_configured_default_limit() {
        let requests = route("Which are the top products and top regions?", 3);
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.limit == 3));

        let requests = route("Our top 10 products", 3);
        assert_eq!(requests[0].limit, 10);
    }
}
