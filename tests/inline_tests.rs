use marktree::inline::{Linkable, clean_autolink};
use marktree::{BlockTag, BlockValue, Chunk, DocParser, Inline, InlineChain, InlineTag, ModelError};

fn texts(n: u32) -> InlineChain {
    let mut chain = InlineChain::new();
    for i in 0..n {
        chain.try_push(Inline::text(Chunk::new(i * 2, i * 2 + 1))).unwrap();
    }
    chain
}

#[test]
fn wrap_keeps_child_chain_in_order() {
    let emph = Inline::wrap(InlineTag::Emph, texts(3)).unwrap();

    let children = emph.children().unwrap();
    assert_eq!(children.len(), 3);
    let starts: Vec<u32> = children.iter().map(|n| n.chunk().unwrap().start).collect();
    assert_eq!(starts, vec![0, 2, 4]);

    // A freshly built node has no siblings of its own.
    let mut chain = InlineChain::new();
    chain.push(emph);
    assert_eq!(chain.len(), 1);
    assert!(chain.next_of(0).is_none());
}

#[test]
fn constructors_check_tags() {
    let c = Chunk::new(0, 1);
    assert!(matches!(
        Inline::literal(InlineTag::SoftBreak, c),
        Err(ModelError::TagMismatch { constructor: "literal", .. })
    ));
    assert!(Inline::wrap(InlineTag::Text, InlineChain::new()).is_err());
    assert!(Inline::simple(InlineTag::Image).is_err());
}

#[test]
fn link_label_is_nested_chain() {
    let source = b"[foo *bar*](/url)";
    let mut label = InlineChain::new();
    label.push(Inline::text(Chunk::new(1, 5)));
    label.push(Inline::emph([Inline::text(Chunk::new(6, 9))].into_iter().collect()));
    let link = Inline::link(label, b"/url".to_vec(), None);

    let Inline::Link(Linkable { label, url, title }) = &link else {
        panic!("expected a link");
    };
    assert_eq!(url, b"/url");
    assert!(title.is_none());
    assert_eq!(label.first().unwrap().chunk().unwrap().slice(source), b"foo ");

    let mut chain = InlineChain::new();
    chain.push(link);
    let mut tags = Vec::new();
    chain.walk(&mut |node, depth| tags.push((node.tag(), depth)));
    assert_eq!(
        tags,
        vec![
            (InlineTag::Link, 0),
            (InlineTag::Text, 1),
            (InlineTag::Emph, 1),
            (InlineTag::Text, 2),
        ]
    );
}

#[test]
fn autolink_destination_is_never_missing() {
    let source = b"<https://example.com/a&amp;b> <  > <\xfe\xff>";
    let good = Inline::autolink(InlineChain::new(), source, Chunk::new(1, 28), false).unwrap();
    assert_eq!(good.linkable().unwrap().url, b"https://example.com/a&b");

    let blank = Inline::autolink(InlineChain::new(), source, Chunk::new(31, 33), false).unwrap();
    assert_eq!(blank.linkable().unwrap().url, b"  ");

    let bad = Inline::autolink(InlineChain::new(), source, Chunk::new(36, 38), true).unwrap();
    assert_eq!(bad.linkable().unwrap().url, b"\xfe\xff");

    let mailto = clean_autolink(source, Chunk::new(1, 28), true).unwrap();
    assert!(mailto.starts_with(b"mailto:https://"));
}

#[test]
fn attach_replaces_previous_chain() {
    let mut p = DocParser::new();
    p.feed_line(b"Hello World").unwrap();
    let para = p.open_block(BlockValue::Paragraph, 1).unwrap();
    p.add_line(0).unwrap();
    p.attach_inlines(para, texts(3)).unwrap();
    let mut doc = p.finish();

    let mut chain = InlineChain::new();
    chain.push(Inline::text(Chunk::new(0, 5)));
    chain.push(Inline::softbreak());
    doc.attach_inlines(para, chain).unwrap();

    let block = doc.block(para).unwrap();
    let inlines = block.inline_content().unwrap();
    assert_eq!(inlines.len(), 2);
    assert_eq!(inlines.get(1).unwrap().tag(), InlineTag::SoftBreak);
    assert_eq!(
        inlines.first().unwrap().chunk().unwrap().slice(block.string_content()),
        b"Hello"
    );
}

#[test]
fn attach_rejects_blocks_without_inline_content() {
    let mut p = DocParser::new();
    let quote = p.open_block(BlockValue::BlockQuote, 1).unwrap();
    let code = p.open_block(BlockValue::IndentedCode, 5).unwrap();
    assert_eq!(
        p.attach_inlines(quote, InlineChain::new()),
        Err(ModelError::NoInlines(BlockTag::BlockQuote))
    );
    assert_eq!(
        p.attach_inlines(code, InlineChain::new()),
        Err(ModelError::NoInlines(BlockTag::IndentedCode))
    );
}

#[test]
fn heading_takes_inlines() {
    let mut p = DocParser::new();
    p.feed_line(b"## Hi").unwrap();
    let h = p.open_block(BlockValue::AtxHeading { level: 2 }, 1).unwrap();
    p.append_text(b"Hi").unwrap();
    let mut doc = p.finish();
    doc.attach_inlines(h, texts(1)).unwrap();
    assert_eq!(doc.block(h).unwrap().inline_content().unwrap().count_nodes(), 1);
}

#[test]
fn autolink_outside_source_is_an_error() {
    let result = Inline::autolink(InlineChain::new(), b"<a@b>", Chunk::new(1, 40), true);
    assert_eq!(
        result,
        Err(ModelError::ChunkOutOfRange { start: 1, end: 40, len: 5 })
    );
}
