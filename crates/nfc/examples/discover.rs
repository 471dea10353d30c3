//! Example driving a full discover, read and write session
//!
//! Platform glue normally feeds tag-presented events into the dispatcher;
//! here a scripted mock transport stands in for the hardware so the whole
//! flow runs anywhere. Run with `RUST_LOG=debug` to watch the wire frames.

use bytes::Bytes;
use tactus_mifare::{MockTag, TagUid, keys};
use tactus_nfc::{
    DispatchIntent, Nfc, StaticAdapter, TagEvent, TagIntents, WriteTagOptions,
    discovered_tag_channel,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    let nfc = Nfc::new(StaticAdapter {
        available: true,
        enabled: true,
    });
    println!(
        "NFC available: {}, enabled: {}",
        nfc.available(),
        nfc.enabled()
    );

    // Hand discovered tags to a channel instead of a callback
    let (sender, receiver) = discovered_tag_channel();
    nfc.dispatcher().subscribe_channel(sender);

    // Script a tag that accepts the factory default key and serves two blocks
    let mut mock = MockTag::with_accepted_key(keys::FACTORY_DEFAULT);
    mock.queue_response(Bytes::from_static(b"hello from block"));
    mock.queue_response(Bytes::from_static(b"and from block 5"));

    // The platform side reports a tag entering the field
    nfc.dispatcher().dispatch(TagEvent {
        uid: TagUid::new(vec![0x04, 0xE1, 0x5C, 0x32]),
        technology: Some(mock),
    });

    let mut tag = receiver.recv()?;
    println!("\nDiscovered tag {}", tag.uid());

    // Read the first two blocks of sector 1
    let blocks = tag.read_blocks(1, &[0, 1])?;
    for (offset, block) in blocks.iter().enumerate() {
        println!("  block {}: {}", offset, String::from_utf8_lossy(block));
    }

    // Write through the intent-resolved path, the way a host app would
    // after stashing the discovery intent
    let target = tactus_mifare::MifareClassic::new(
        TagUid::new(vec![0x04, 0xE1, 0x5C, 0x32]),
        MockTag::with_accepted_key(keys::FACTORY_DEFAULT),
    );
    let intents = TagIntents::none().with_current(DispatchIntent::with_tag(target));
    let buffer = Bytes::from_static(b"greetings, mifare classic tag!");
    let chunks = buffer.len().div_ceil(tactus_mifare::BLOCK_SIZE);

    nfc.write_tag(intents, &WriteTagOptions { sector: 1, buffer })?;
    println!("\nWrote {chunks} chunks to sector 1");

    Ok(())
}
