pub mod faq;
pub mod product;
