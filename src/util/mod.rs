pub mod adf;
