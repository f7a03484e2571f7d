pub mod address;

pub mod kstack;
