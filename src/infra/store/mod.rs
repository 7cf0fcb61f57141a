pub mod http_store;
