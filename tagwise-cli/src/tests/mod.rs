//! Shared test harness modules for the tagwise CLI.

use super::*;

mod helpers;
