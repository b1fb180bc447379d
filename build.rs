//! Retrieves information about the version of the binary from Git and the
//! build environment. It is exposed at runtime through `gambit::version()`.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
