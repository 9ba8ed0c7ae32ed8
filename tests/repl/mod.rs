//! REPL command builder tests.

mod runner_test;
