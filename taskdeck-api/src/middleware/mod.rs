/// Gates that run after the bearer token has been checked

pub mod auth;
