use mazeviz::app::App;

fn main() -> std::io::Result<()> {
    // The terminal is taken over by the visualization, so logs go to a
    // file next to the binary.
    let file_appender = tracing_appender::rolling::never(".", "mazeviz.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::default().run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    result
}
