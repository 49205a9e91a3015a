mod login;
mod policies;
mod token_header;
