use rustvfs::vfserver::boot;
use rustvfs::vfserver::bootfs::BootfsImage;
use rustvfs::vfserver::syscalls::fs_constants::*;

// Boot a small system from a packed image and echo a file through the
// console descriptors. The halt-on-failure decision lives here, not inside
// the boot procedure.
fn main() {
    let image = BootfsImage::build(&[
        ("/etc/motd", b"welcome to rustvfs\n"),
        ("/usr/lib/libdemo.so", &[0x7f, b'E', b'L', b'F']),
    ]);
    let dirs = ["/etc", "/usr", "/usr/lib"];

    let server = match boot::boot(&image, &dirs) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("boot failed: {}", e);
            std::process::exit(1);
        }
    };

    let task = server.task();
    let fd = task.open_syscall("/etc/motd", O_RDONLY, 0);
    if fd < 0 {
        eprintln!("open /etc/motd failed: {}", -fd);
        std::process::exit(1);
    }
    let mut buf = [0u8; 128];
    let n = task.read_syscall(fd, &mut buf);
    if n < 0 {
        eprintln!("read /etc/motd failed: {}", -n);
        std::process::exit(1);
    }
    task.write_syscall(1, &buf[..n as usize]);
    task.close_syscall(fd);

    print!("{}", String::from_utf8_lossy(&server.console().take_output()));
}
