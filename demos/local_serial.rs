use std::{
    env,
    io::{self, Read},
    time::Duration,
};

use radio_message_parser::{Config, Parser, FRAME_LEN};

fn main() {
    let path = env::args().nth(1).expect("no serial port supplied");
    let mut port = serialport::new(path, 115_200)
        .timeout(Duration::from_millis(20))
        .open()
        .expect("failed to open serial port");

    let mut storage = [0; 256];
    let mut parser =
        Parser::with_storage(&mut storage, Config::default()).expect("failed to create parser");

    let mut buf = [0; 1024];
    let mut frame = [0; FRAME_LEN];
    loop {
        match port.read(buf.as_mut_slice()) {
            Ok(n) => {
                let mut remaining = &buf[..n];
                while !remaining.is_empty() {
                    let written = parser.put(remaining);
                    remaining = &remaining[written..];

                    while let Some(result) = parser.try_process(&mut frame) {
                        match result {
                            Ok(frame) => println!("{:02x?}", frame.payload()),
                            Err(err) => eprintln!("{err}"),
                        }
                    }
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => (),
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }
}
