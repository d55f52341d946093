//! Integration tests for the devnet wallet.


pub mod dispatch_tests;
