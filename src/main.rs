fn main() -> std::process::ExitCode {
    menu_recognizer_lib::run()
}
