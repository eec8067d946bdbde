pub mod token_response;
