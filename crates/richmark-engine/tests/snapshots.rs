//! Canonical output kept inline so serializer changes show up in review.

use richmark_engine::{PluginRegistry, parse, serialize};

fn canonical(md: &str) -> String {
    let registry = PluginRegistry::builtin();
    serialize(&parse(md, &registry).tree, &registry)
}

#[test]
fn tables_are_padded_and_aligned() {
    insta::assert_snapshot!(canonical("|a|b|\n|:-|-:|\n|1|2|\n"), @r"
    | a | b |
    | :--- | ---: |
    | 1 | 2 |
    ");
}

#[test]
fn alternate_emphasis_is_normalised() {
    insta::assert_snapshot!(canonical("__strong__ and _soft_\n"), @"**strong** and *soft*");
}

#[test]
fn fences_keep_their_character() {
    insta::assert_snapshot!(canonical("~~~py\nprint(1)\n~~~\n"), @r"
    ~~~py
    print(1)
    ~~~
    ");
}
