pub mod actransit_api_model;
