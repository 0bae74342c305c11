pub mod top_chart_fetcher;
