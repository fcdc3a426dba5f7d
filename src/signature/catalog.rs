//! Built-in signature catalog
//!
//! One ordered table keyed by format. Each entry lists the magic patterns
//! that identify the format and the file extensions the format is expected
//! to carry. Patterns flagged `verify_only` take part in extension
//! verification but never in prefix identification, which keeps both checks
//! in a single table without changing what either of them reports.
//!
//! Table order is load-bearing: identification and extension verification
//! both walk it top to bottom and stop at the first matching entry.

/// A single magic-byte pattern.
pub struct SignaturePattern {
    pub bytes: &'static [u8],
    pub description: &'static str,
    /// Extension-verification only; skipped by `identify_signatures`.
    pub verify_only: bool,
}

/// A format entry: patterns plus the extensions the format legitimately uses.
pub struct FormatEntry {
    pub format: &'static str,
    /// Expected extensions (lowercase, with dot). Empty means the catalog
    /// has no opinion about this format's extension.
    pub extensions: &'static [&'static str],
    pub patterns: &'static [SignaturePattern],
}

const fn pat(bytes: &'static [u8], description: &'static str) -> SignaturePattern {
    SignaturePattern {
        bytes,
        description,
        verify_only: false,
    }
}

const fn verify(bytes: &'static [u8]) -> SignaturePattern {
    SignaturePattern {
        bytes,
        description: "",
        verify_only: true,
    }
}

/// The format catalog.
pub static CATALOG: &[FormatEntry] = &[
    FormatEntry {
        format: "ID3",
        extensions: &[".mp3"],
        patterns: &[pat(b"ID3", "ID3v2 tag")],
    },
    FormatEntry {
        format: "FLAC",
        extensions: &[".flac"],
        patterns: &[pat(b"fLaC", "FLAC header")],
    },
    FormatEntry {
        format: "WAV",
        extensions: &[".wav"],
        patterns: &[pat(b"RIFF", "WAV container")],
    },
    FormatEntry {
        format: "MP3",
        extensions: &[".mp3"],
        patterns: &[
            pat(&[0xFF, 0xFB], "MP3 frame"),
            pat(&[0xFF, 0xF3], "MP3 frame"),
            verify(&[0xFF, 0xF2]),
            verify(&[0xFF, 0xF1]),
        ],
    },
    FormatEntry {
        format: "AAC",
        extensions: &[".aac"],
        patterns: &[
            pat(&[0xFF, 0xF1], "AAC ADTS"),
            pat(&[0xFF, 0xF9], "AAC ADTS"),
        ],
    },
    FormatEntry {
        format: "Ogg",
        extensions: &[".ogg"],
        patterns: &[pat(b"OggS", "Ogg container")],
    },
    FormatEntry {
        format: "EXE",
        extensions: &[],
        patterns: &[pat(b"MZ", "DOS executable")],
    },
    FormatEntry {
        format: "ZIP",
        extensions: &[],
        patterns: &[pat(b"PK\x03\x04", "ZIP archive")],
    },
    FormatEntry {
        format: "PNG",
        extensions: &[],
        patterns: &[pat(b"\x89PNG", "PNG image")],
    },
    FormatEntry {
        format: "M4A",
        extensions: &[".m4a"],
        patterns: &[
            verify(b"ftypM4A"),
            verify(b"ftypmp42"),
            verify(b"ftypisom"),
        ],
    },
    FormatEntry {
        format: "AIFF",
        extensions: &[".aiff"],
        patterns: &[verify(b"FORM")],
    },
    FormatEntry {
        format: "WMA",
        extensions: &[".wma"],
        patterns: &[verify(&[
            0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62,
            0xCE, 0x6C,
        ])],
    },
];

/// Archive/image magics scanned for anywhere inside a buffer, used on the
/// trailer window to catch appended or embedded payloads.
pub static EMBEDDED_SIGNATURES: &[(&str, &[u8])] = &[
    ("ZIP", b"PK\x03\x04"),
    ("RAR", b"Rar!\x1a\x07\x00"),
    ("PDF", b"%PDF-"),
    ("JPG", &[0xFF, 0xD8, 0xFF]),
    ("PNG", b"\x89PNG"),
    ("GZIP", &[0x1F, 0x8B]),
];

/// Known standard end-of-stream markers, uppercase hex. Markers shorter than
/// the 8-byte trailing read are matched as a suffix.
pub static STANDARD_EOF_MARKERS: &[&str] = &[
    "FFD9",             // JPEG EOI
    "00000000",         // generic zero padding
    "49454E44AE426082", // PNG IEND chunk + CRC
];
