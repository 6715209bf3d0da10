pub mod sports;
