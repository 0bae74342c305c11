pub mod chart_reporter;
