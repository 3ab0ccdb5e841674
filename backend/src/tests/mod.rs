mod common;

mod relay_client_test;
mod tutor_api_test;
