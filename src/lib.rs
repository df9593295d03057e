// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to run the backup interactively.
//
// Module responsibilities:
// - `api`: dog.ceo image source (sub-breed list, random image URL,
//   image download) behind the `ImageSource` trait.
// - `disk`: Yandex.Disk storage client (folder creation, existence
//   check, two-step upload) behind the `RemoteStore` trait.
// - `backup`: the orchestrator — config, per-file records, run report,
//   manifest writing. Takes the traits as parameters so it can be run
//   headless and tested against in-memory fakes.
// - `ui`: interactive prompts, token persistence and the final summary.
pub mod api;
pub mod backup;
pub mod disk;
pub mod ui;
