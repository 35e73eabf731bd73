//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if config.model.path.is_none() {
        print_first_time_help();
    } else {
        print_configured_help();
    }
}

/// Print setup guide for first-time users.
pub fn print_first_time_help() {
    println!("No model configured. Get started with fisk:");
    println!();
    println!("1. Initialize configuration:");
    println!("   fisk config init");
    println!();
    println!("2. Point [model] at your ONNX classifier and its label list:");
    println!("   path = \"/path/to/fish_model.onnx\"");
    println!("   labels = \"/path/to/labels.txt\"");
    println!();
    println!("   A model whose labels include \"Other\" is treated as a single-species");
    println!("   detector and must agree with itself on a mirrored image.");
    println!();
    println!("3. Optionally place config.json (thresholds) and metadata.json next to");
    println!("   the config file, under assets/.");
    println!();
    println!("4. Identify a catch:");
    println!("   fisk fangst.jpg");
    println!();
    println!("Run 'fisk -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help() {
    println!("Usage: fisk [IMAGES]... [OPTIONS]");
    println!();
    println!("Example: fisk fangst.jpg --json");
    println!();
    println!("Run 'fisk -h' for all options or 'fisk quality <IMAGES>' to check a photo first.");
}
