pub mod cart;
pub mod checkout;
pub mod confirmation;
pub mod login;
pub mod page_model;
pub mod pages;
pub mod products;
