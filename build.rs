#[cfg(target_os = "windows")]
fn main() {
    let mut res = winres::WindowsResource::new();
    res.set("ProductName", "IME Color Indicator");
    res.set("FileDescription", "Screen-edge IME state indicator");
    res.compile().expect("failed to compile resources");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
