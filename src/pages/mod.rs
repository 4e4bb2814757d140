pub mod mint_page;
pub mod mint_form;
pub mod connect_button;

pub use mint_page::MintPage;
