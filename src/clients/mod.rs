pub mod browser_client;
