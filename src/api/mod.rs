pub mod jaga_dana;
