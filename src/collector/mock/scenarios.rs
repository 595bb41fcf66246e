//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` filesystem states
//! for testing the parsers and the collector. All of them are mounted
//! at `/proc`.

use super::filesystem::MockFs;

/// Network device table shared by every process in the sample host's namespace.
///
/// Non-loopback totals: rx 54504114 bytes / 65296 packets, tx 4258632 bytes / 39739 packets.
pub const SAMPLE_NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  123456    1234    0    0    0     0          0         0   123456    1234    0    0    0     0       0          0
  eth0: 54000000   65000    0    0    0     0          0        12  4000000   39000    0    0    0     0       0          0
  eth1:  504114     296    0    0    0     0          0         0   258632     739    0    0    0     0       0          0
";

/// `/proc/meminfo` of a 64 GiB host.
pub const SAMPLE_MEMINFO: &str = "\
MemTotal:       65652452 kB
MemFree:        17221344 kB
MemAvailable:   50742364 kB
Buffers:         6498668 kB
Cached:         24950648 kB
SwapCached:           24 kB
Active:         27723168 kB
Inactive:       15365816 kB
Active(anon):   11602248 kB
Inactive(anon):   312948 kB
Active(file):   16120920 kB
Inactive(file): 15052868 kB
Unevictable:          32 kB
Mlocked:              32 kB
SwapTotal:       2097148 kB
SwapFree:        2096116 kB
Dirty:               796 kB
Writeback:             0 kB
Slab:            2318476 kB
SReclaimable:    1961604 kB
HugePages_Total:       0
HugePages_Free:        0
Hugepagesize:       2048 kB
";

/// `/proc/stat` of a two-CPU host.
pub const SAMPLE_STAT: &str = "\
cpu  2400 87 600 100000 50 100 83 0 0 0
cpu0 1200 40 300 50000 25 50 40 0 0 0
cpu1 1200 47 300 50000 25 50 43 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
";

#[allow(dead_code)]
impl MockFs {
    /// Creates the reference host used across the test suite.
    ///
    /// Includes `ibazel` (PID 123) with every per-process file, including fds
    /// and namespace pids, and `at-spi2-registryd` (PID 456) whose cmdline
    /// carries trailing NUL padding.
    pub fn sample_host() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/meminfo", SAMPLE_MEMINFO);
        fs.add_file("/proc/stat", SAMPLE_STAT);

        fs.add_process(
            123,
            "123 (ibazel) S 1 123 123 0 -1 1077936384 1799 6520 55 0 8 23 3 11 20 0 13 0 14329 114384896 2577 18446744073709551615 4194304 7975895 140730741880176 0 0 0 1006254592 0 2143420159 0 0 0 17 3 0 0 3 0 0 10171576 10318336 13176832 140730741887443 140730741887563 140730741887563 140730741891038 0\n",
            "\
Name:\tibazel
Umask:\t0022
State:\tS (sleeping)
Tgid:\t123
Ngid:\t0
Pid:\t123
PPid:\t1
TracerPid:\t0
Uid:\t1000\t1001\t1002\t1003
Gid:\t1000\t1000\t1000\t1000
FDSize:\t64
NStgid:\t123\t7
NSpid:\t123\t7
NSpgid:\t123\t7
NSsid:\t123\t7
VmPeak:\t  111704 kB
VmSize:\t  111704 kB
VmRSS:\t   10308 kB
Threads:\t13
voluntary_ctxt_switches:\t3113
nonvoluntary_ctxt_switches:\t97
",
            "\
rchar: 5405203
wchar: 1239158
syscr: 22052
syscw: 9847
read_bytes: 17838080
write_bytes: 634880
cancelled_write_bytes: 192512
",
            "/usr/lib/slack/slack\0--force-device-scale-factor=1.5\0--high-dpi-support=1\0",
        );
        fs.add_file("/proc/123/net/dev", SAMPLE_NET_DEV);
        fs.add_symlink("/proc/123/exe", "/usr/bin/ibazel");
        fs.add_symlink("/proc/123/fd/0", "/dev/null");
        fs.add_symlink("/proc/123/fd/1", "/foobar");
        fs.add_symlink("/proc/123/fd/2", "socket:[12345]");
        fs.add_symlink("/proc/123/fd/5", "pipe:[67890]");

        fs.add_process(
            456,
            "456 (at-spi2-registr) S 1 455 455 0 -1 4194560 301 0 2 0 11 7 0 0 20 0 3 0 20551 238342144 1696 18446744073709551615 1 1 0 0 0 0 0 4096 16386 0 0 0 17 1 0 0 0 0 0 0 0 0 0 0 0 0 0\n",
            "Name:\tat-spi2-registr\nPid:\t456\nPPid:\t1\nUid:\t0\t0\t0\t0\n",
            "\
rchar: 0
wchar: 0
syscr: 0
syscw: 0
read_bytes: 0
write_bytes: 0
cancelled_write_bytes: 0
",
            "/usr/lib/at-spi2-core/at-spi2-registryd\0--use-gnome-session\0\0\0",
        );
        fs.add_file("/proc/456/net/dev", SAMPLE_NET_DEV);

        fs
    }

    /// Creates a host with processes whose names contain spaces and parentheses.
    pub fn with_special_names() -> Self {
        let mut fs = Self::sample_host();

        // Process with spaces in name (e.g., Firefox content process)
        fs.add_process(
            5000,
            "5000 (Web Content) S 4999 5000 4999 0 -1 4194304 100000 0 500 0 5000 1000 0 0 20 0 20 0 500000 2000000000 50000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "Name:\tWeb Content\nPid:\t5000\nPPid:\t4999\nUid:\t1000\t1000\t1000\t1000\n",
            "",
            "/usr/lib/firefox/firefox\0-contentproc\0",
        );

        // Closing parenthesis inside the name
        fs.add_process(
            5001,
            "5001 (a) b) R 1 5001 5001 0 -1 4194304 42 0 1 0 10 5 0 0 20 0 2 0 500100 10000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "Name:\ta) b\nPid:\t5001\nPPid:\t1\nUid:\t0\t0\t0\t0\n",
            "",
            "./a) b\0",
        );

        // Nested parentheses
        fs.add_process(
            5002,
            "5002 (test(1)) S 1 5002 5002 0 -1 4194304 1000 0 0 0 10 5 0 0 20 0 1 0 500200 10000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "Name:\ttest(1)\nPid:\t5002\nPPid:\t1\nUid:\t0\t0\t0\t0\n",
            "",
            "",
        );

        fs
    }

    /// Creates a host with a zombie process.
    ///
    /// Zombies keep their `stat` but have no memory and an empty cmdline.
    pub fn with_zombie_process() -> Self {
        let mut fs = Self::sample_host();

        fs.add_process(
            4000,
            "4000 (defunct) Z 123 4000 123 0 -1 4194308 0 0 0 0 0 0 0 0 20 0 1 0 400000 0 0 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 -1 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "Name:\tdefunct\nState:\tZ (zombie)\nPid:\t4000\nPPid:\t123\nUid:\t1000\t1000\t1000\t1000\n",
            "",
            "",
        );

        fs
    }

    /// Creates a host whose files do not match the layouts we parse.
    ///
    /// Models an old kernel: `meminfo` predates `MemAvailable`, the pid stat
    /// line is truncated and the io table lacks `read_bytes`.
    pub fn with_format_drift() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
",
        );
        fs.add_file("/proc/stat", "intr 1000000 50\nctxt 500000\n");

        fs.add_process(
            777,
            "777 (legacy) S 1 777 777 0 -1 4194304 10 0 0 0 1 1\n",
            "Name:\tlegacy\nPid:\t777\n",
            "rchar: 100\nwchar: 50\nwrite_bytes: 0\n",
            "legacy\0",
        );
        fs.add_file(
            "/proc/777/net/dev",
            "Inter-|   Receive |  Transmit\n face |bytes packets|bytes packets\n  eth0 1 2 3 4\n",
        );

        fs
    }
}
