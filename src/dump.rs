// SPDX-License-Identifier: LGPL-3.0-or-later

//! Structural dump of a parsed file, for diagnostics and tests.

#[cfg(feature = "dump")]
use std::collections::HashMap;

/// Trait for printing an indented structural dump of a component.
pub trait Dump {
    #[cfg(feature = "dump")]
    fn print_dump(&self, indent: u32);

    #[cfg(feature = "dump")]
    fn print_dump_with_args(&self, indent: u32, _args: HashMap<&str, String>) {
        self.print_dump(indent);
    }
}

#[cfg(feature = "dump")]
pub fn dump_indent(indent: u32) -> String {
    let mut s = String::with_capacity(indent as usize * 2);
    for _ in 0..indent {
        s.push_str("  ");
    }
    s
}

#[macro_export]
macro_rules! dump_println {
    ( $indent:expr, $( $x:expr ),* ) => {
        {
            use $crate::dump::dump_indent;
            print!("{}", dump_indent( $indent ));
            println!($( $x ),*);
        }
    };
}
