pub mod args_def;
