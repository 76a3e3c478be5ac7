//! Page objects: one struct per screen, CSS locators as constants, every
//! interaction routed through a page-labeled [`pommel_core::interactor::Interactor`].

pub mod login;
pub mod products;
